/*!
# Error types

This module holds the diagnostics reported by the tokenizer and the file
loader. None of these are returned as `Err` from the tokenizer: they are
delivered to [`Sink::on_error`](crate::Sink::on_error) while scanning goes
on.
*/
use std::error;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::sync::Arc;

use crate::lexer::Position;
use crate::Name;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Unexpected code point in a given scanning context.
	Lexical,
	/// Duplicate attribute, attributes on an end tag, malformed self-close or
	/// malformed comment terminator.
	Structural,
	/// Malformed or illegal character or entity reference.
	Reference,
	/// Recognized, but rejected markup (declarations, CDATA sections).
	Unsupported,
	/// Input ended inside a markup token. This is the only kind which halts
	/// the parse.
	Fatal,
	/// The document could not be loaded.
	Load,
}

/// Where an unexpected character was encountered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorContext {
	/// Directly after `<`
	AfterLeftAngle,
	/// Inside a start tag with the given name (possibly incomplete)
	StartTag(Name),
	/// Inside an end tag with the given name (possibly empty)
	EndTag(Name),
	/// After the `/` of a self-closing tag
	EmptyTag(Name),
	/// Directly after `<!`
	AfterBang,
	/// Directly after `<!-`
	AfterBangHyphen,
	/// Directly after `<?`
	AfterQuestionMark,
	/// After the target of a processing instruction
	ProcessingInstruction(Name),
	/// Directly after `&`
	AfterAmpersand,
	/// Inside `&name` before the terminating `;`
	EntityReference(Name),
	/// Inside `&#...` before the terminating `;`
	CharacterReference,
}

impl ErrorContext {
	fn kind(&self) -> ErrorKind {
		match self {
			Self::EmptyTag(_) => ErrorKind::Structural,
			Self::AfterAmpersand | Self::EntityReference(_) | Self::CharacterReference => {
				ErrorKind::Reference
			}
			_ => ErrorKind::Lexical,
		}
	}
}

impl fmt::Display for ErrorContext {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::AfterLeftAngle => f.write_str("after left angle bracket '<'"),
			Self::StartTag(name) => write!(f, "in start tag '{}'", name),
			Self::EndTag(name) => write!(f, "in end tag '{}'", name),
			Self::EmptyTag(name) => write!(f, "in empty tag '{}'", name),
			Self::AfterBang => f.write_str("after '<!'"),
			Self::AfterBangHyphen => f.write_str("after '<!-'"),
			Self::AfterQuestionMark => f.write_str("after '<?'"),
			Self::ProcessingInstruction(target) => {
				write!(f, "in processing instruction '{}'", target)
			}
			Self::AfterAmpersand => f.write_str("after '&'"),
			Self::EntityReference(name) => write!(f, "in entity reference '&{}'", name),
			Self::CharacterReference => f.write_str("in character reference"),
		}
	}
}

/// Markup which is recognized, but not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construct {
	/// `<![CDATA[...]]>`
	CDataSection,
	/// `<!KEYWORD ...>`, e.g. `DOCTYPE` or `ELEMENT`
	Declaration(Name),
}

/// [`std::sync::Arc`]-based around [`std::io::Error`] to allow cloning.
#[derive(Clone)]
pub struct IOErrorWrapper(Arc<io::Error>);

impl IOErrorWrapper {
	pub(crate) fn wrap(e: io::Error) -> IOErrorWrapper {
		IOErrorWrapper(Arc::new(e))
	}
}

impl fmt::Debug for IOErrorWrapper {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl fmt::Display for IOErrorWrapper {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&**self, f)
	}
}

impl PartialEq for IOErrorWrapper {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Deref for IOErrorWrapper {
	type Target = io::Error;

	fn deref(&self) -> &io::Error {
		&*self.0
	}
}

/// A single problem found while loading or scanning a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	/// Code point which was not expected in the given context.
	UnexpectedChar(char, ErrorContext),

	/// Name-start character after the name of an end tag.
	EndTagAttributes(Name),

	/// Second value for an attribute name within one tag.
	DuplicateAttribute(Name),

	/// `--` inside a comment which is not followed by `>`.
	DoubleHyphenInComment,

	/// `&#0;` or an equivalent spelling.
	NullCharacterReference,

	/// Numeric reference to a code point outside of the referenceable
	/// ranges. The value saturates at `u32::MAX`.
	IllegalCharacterReference(u32),

	/// Input ended before the terminating `;` of a reference.
	UnterminatedReference,

	/// Recognized, but unsupported markup.
	Unsupported(Construct),

	/// Input ended inside a markup token.
	UnexpectedEof,

	/// The document could not be read.
	Io {
		path: String,
		error: IOErrorWrapper,
	},

	/// The document is not valid UTF-8.
	InvalidUtf8 { path: String },
}

impl Error {
	/// Classify the error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::UnexpectedChar(_, ctx) => ctx.kind(),
			Self::EndTagAttributes(_) | Self::DuplicateAttribute(_) | Self::DoubleHyphenInComment => {
				ErrorKind::Structural
			}
			Self::NullCharacterReference
			| Self::IllegalCharacterReference(_)
			| Self::UnterminatedReference => ErrorKind::Reference,
			Self::Unsupported(_) => ErrorKind::Unsupported,
			Self::UnexpectedEof => ErrorKind::Fatal,
			Self::Io { .. } | Self::InvalidUtf8 { .. } => ErrorKind::Load,
		}
	}

	/// Return true if no further events follow this error.
	pub fn is_fatal(&self) -> bool {
		matches!(self.kind(), ErrorKind::Fatal | ErrorKind::Load)
	}

	pub(crate) fn io<P: Into<String>>(path: P, e: io::Error) -> Error {
		Error::Io {
			path: path.into(),
			error: IOErrorWrapper::wrap(e),
		}
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::UnexpectedChar(ch, ctx) => write!(f, "unexpected '{}' {}", ch, ctx),
			Self::EndTagAttributes(name) => write!(f, "end tag '{}' cannot contain attributes", name),
			Self::DuplicateAttribute(name) => write!(f, "redefinition of attribute '{}'", name),
			Self::DoubleHyphenInComment => f.write_str("unexpected double hyphen '--' inside comment body"),
			Self::NullCharacterReference => f.write_str("cannot reference null character"),
			Self::IllegalCharacterReference(_) => f.write_str("cannot reference illegal character"),
			Self::UnterminatedReference => f.write_str("unexpected end of stream inside reference"),
			Self::Unsupported(Construct::CDataSection) => f.write_str("CDATA sections are unsupported"),
			Self::Unsupported(Construct::Declaration(keyword)) => {
				write!(f, "declaration '<!{}' is unsupported", keyword)
			}
			Self::UnexpectedEof => f.write_str("unexpected end of stream inside markup structure"),
			Self::Io { path, error } => write!(f, "could not open file stream '{}': {}", path, error),
			Self::InvalidUtf8 { path } => write!(f, "file '{}' is not valid UTF-8", path),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Self::Io { error, .. } => Some(&**error),
			_ => None,
		}
	}
}

/// An [`Error`] together with the position of the offending code point.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
	error: Error,
	position: Position,
}

impl Diagnostic {
	pub fn new(error: Error, position: Position) -> Diagnostic {
		Diagnostic { error, position }
	}

	pub fn error(&self) -> &Error {
		&self.error
	}

	pub fn into_error(self) -> Error {
		self.error
	}

	pub fn position(&self) -> Position {
		self.position
	}

	/// Zero-based line of the offending code point.
	pub fn line(&self) -> usize {
		self.position.line
	}

	/// Zero-based column (in code points) of the offending code point.
	pub fn column(&self) -> usize {
		self.position.column
	}

	/// Human-readable description, without position.
	pub fn message(&self) -> String {
		self.error.to_string()
	}
}

impl fmt::Display for Diagnostic {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "({}:{}) {}", self.position.line + 1, self.position.column + 1, self.error)
	}
}

impl error::Error for Diagnostic {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		Some(&self.error)
	}
}
