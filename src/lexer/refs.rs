/*!
# Character and entity reference decoding

Only the five predefined entities of XML 1.0 § 4.6 are known. Other entity
names are passed through verbatim.
*/
use xmltok_validation::{is_name_char, is_name_start_char};

use super::cursor::{Cursor, Position};
use crate::error::{Diagnostic, Error, ErrorContext};

/// Look up one of the predefined entities.
pub fn resolve_named_entity(name: &str) -> Option<char> {
	// amp, lt, gt, apos, quot
	match name {
		"amp" => Some('&'),
		"lt" => Some('<'),
		"gt" => Some('>'),
		"apos" => Some('\''),
		"quot" => Some('"'),
		_ => None,
	}
}

/// Map the value of a numeric character reference to a char.
pub fn resolve_char_reference(codepoint: u32) -> Result<char, Error> {
	match codepoint {
		0 => Err(Error::NullCharacterReference),
		0x1..=0xd7ff | 0xe000..=0xfffd | 0x10000..=0x10ffff => {
			std::char::from_u32(codepoint).ok_or(Error::IllegalCharacterReference(codepoint))
		}
		_ => Err(Error::IllegalCharacterReference(codepoint)),
	}
}

/**
Decode the reference starting right after the `&` at `amp`.

On success, the expansion is appended to `out`. If the reference is
malformed or refers to an illegal character, the text consumed so far
(including the `&`) is appended instead and the diagnostic is returned. The
character which made the reference malformed is left in the cursor.
*/
pub fn expand_reference(cursor: &mut Cursor<'_>, amp: Position, out: &mut String) -> Result<(), Diagnostic> {
	let mut literal = String::from("&");
	match decode(cursor, amp, &mut literal) {
		Ok(Some(ch)) => {
			out.push(ch);
			Ok(())
		}
		Ok(None) => {
			out.push_str(&literal);
			Ok(())
		}
		Err(e) => {
			out.push_str(&literal);
			Err(e)
		}
	}
}

/// Consume the next char if `accept` selects it.
fn take<F: Fn(char) -> bool>(
	cursor: &mut Cursor<'_>,
	literal: &mut String,
	accept: F,
	ctx: ErrorContext,
) -> Result<char, Diagnostic> {
	let pos = cursor.position();
	match cursor.peek() {
		None => Err(Diagnostic::new(Error::UnterminatedReference, pos)),
		Some(ch) if accept(ch) => {
			cursor.next();
			literal.push(ch);
			Ok(ch)
		}
		Some(ch) => Err(Diagnostic::new(Error::UnexpectedChar(ch, ctx), pos)),
	}
}

fn decode(cursor: &mut Cursor<'_>, amp: Position, literal: &mut String) -> Result<Option<char>, Diagnostic> {
	let first = take(
		cursor,
		literal,
		|c| c == '#' || is_name_start_char(c),
		ErrorContext::AfterAmpersand,
	)?;
	if first == '#' {
		return decode_numeric(cursor, amp, literal).map(Some);
	}
	loop {
		let pos = cursor.position();
		match cursor.peek() {
			None => return Err(Diagnostic::new(Error::UnterminatedReference, pos)),
			Some(';') => {
				cursor.next();
				let resolved = resolve_named_entity(&literal[1..]);
				literal.push(';');
				return Ok(resolved);
			}
			Some(ch) if is_name_char(ch) => {
				cursor.next();
				literal.push(ch);
			}
			Some(ch) => {
				return Err(Diagnostic::new(
					Error::UnexpectedChar(ch, ErrorContext::EntityReference(literal[1..].into())),
					pos,
				))
			}
		}
	}
}

fn decode_numeric(cursor: &mut Cursor<'_>, amp: Position, literal: &mut String) -> Result<char, Diagnostic> {
	let radix = match cursor.peek() {
		Some(ch @ 'x') | Some(ch @ 'X') => {
			cursor.next();
			literal.push(ch);
			16
		}
		_ => 10,
	};
	let mut value = 0u32;
	let mut ndigits = 0usize;
	loop {
		let pos = cursor.position();
		match cursor.peek() {
			None => return Err(Diagnostic::new(Error::UnterminatedReference, pos)),
			Some(';') if ndigits > 0 => {
				cursor.next();
				literal.push(';');
				return resolve_char_reference(value).map_err(|e| Diagnostic::new(e, amp));
			}
			Some(ch) => match ch.to_digit(radix) {
				Some(digit) => {
					cursor.next();
					literal.push(ch);
					ndigits += 1;
					value = value.saturating_mul(radix).saturating_add(digit);
				}
				None => {
					return Err(Diagnostic::new(
						Error::UnexpectedChar(ch, ErrorContext::CharacterReference),
						pos,
					))
				}
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// returns expansion, diagnostic and the rest of the input
	fn run(src: &str) -> (String, Option<Diagnostic>, String) {
		let buf: Vec<char> = src.chars().collect();
		let mut cursor = Cursor::new(&buf);
		assert_eq!(cursor.next(), Some('&'));
		let mut out = String::new();
		let result = expand_reference(&mut cursor, Position::new(0, 0), &mut out);
		let rest: String = buf[cursor.offset()..].iter().collect();
		(out, result.err(), rest)
	}

	#[test]
	fn predefined_entities() {
		assert_eq!(run("&amp;").0, "&");
		assert_eq!(run("&lt;").0, "<");
		assert_eq!(run("&gt;").0, ">");
		assert_eq!(run("&apos;").0, "'");
		assert_eq!(run("&quot;").0, "\"");
	}

	#[test]
	fn unknown_entities_pass_through() {
		let (out, err, rest) = run("&nbsp;x");
		assert_eq!(out, "&nbsp;");
		assert!(err.is_none());
		assert_eq!(rest, "x");
	}

	#[test]
	fn numeric_references() {
		assert_eq!(run("&#65;").0, "A");
		assert_eq!(run("&#x41;").0, "A");
		assert_eq!(run("&#X41;").0, "A");
		assert_eq!(run("&#x1F600;").0, "\u{1f600}");
		assert_eq!(run("&#0000065;").0, "A");
	}

	#[test]
	fn null_reference_is_rejected_without_substitution() {
		let (out, err, _) = run("&#0;");
		assert_eq!(out, "&#0;");
		let err = err.unwrap();
		assert_eq!(*err.error(), Error::NullCharacterReference);
		assert_eq!(err.message(), "cannot reference null character");
		assert_eq!(err.position(), Position::new(0, 0));
	}

	#[test]
	fn illegal_references_are_rejected() {
		for src in &["&#xD800;", "&#xDFFF;", "&#xFFFE;", "&#xFFFF;", "&#x110000;", "&#99999999999999;"] {
			let (out, err, _) = run(src);
			assert_eq!(out, *src);
			assert_eq!(err.unwrap().message(), "cannot reference illegal character");
		}
		assert!(run("&#xD7FF;").1.is_none());
		assert!(run("&#xE000;").1.is_none());
		assert!(run("&#xFFFD;").1.is_none());
		assert!(run("&#x10000;").1.is_none());
		assert!(run("&#x10FFFF;").1.is_none());
	}

	#[test]
	fn malformed_reference_keeps_partial_text_and_offending_char() {
		let (out, err, rest) = run("&#x;");
		assert_eq!(out, "&#x");
		assert_eq!(rest, ";");
		let err = err.unwrap();
		assert_eq!(*err.error(), Error::UnexpectedChar(';', ErrorContext::CharacterReference));
		assert_eq!(err.position(), Position::new(0, 3));

		let (out, err, rest) = run("&amp<b>");
		assert_eq!(out, "&amp");
		assert_eq!(rest, "<b>");
		assert_eq!(err.unwrap().message(), "unexpected '<' in entity reference '&amp'");

		let (out, err, rest) = run("& b");
		assert_eq!(out, "&");
		assert_eq!(rest, " b");
		assert_eq!(err.unwrap().message(), "unexpected ' ' after '&'");

		let (out, _, rest) = run("&#12a;");
		assert_eq!(out, "&#12");
		assert_eq!(rest, "a;");
	}

	#[test]
	fn unterminated_reference() {
		let (out, err, rest) = run("&amp");
		assert_eq!(out, "&amp");
		assert_eq!(rest, "");
		let err = err.unwrap();
		assert_eq!(*err.error(), Error::UnterminatedReference);
		assert_eq!(err.position(), Position::new(0, 4));

		let (out, err, _) = run("&");
		assert_eq!(out, "&");
		assert_eq!(*err.unwrap().error(), Error::UnterminatedReference);
	}
}
