/*!
# Constants and Utilities for matching ranges of codepoints

The tables in this module transcribe the `NameStartChar`, `NameChar` and `S`
productions of XML 1.0 (Fifth Edition) § 2.3.
*/
use std::fmt;

/**
# Predicate trait for matching chars
*/
pub trait CharSelector {
	/// Return true if the given char is selected by the selector
	fn select(&self, c: char) -> bool;
}

// start to end (incl., because some of our edge points are not valid chars
// in rust)
/// Selects all chars from a range (including both ends)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CodepointRange(pub char, pub char);

// XML 1.0 § 2.3 [4]
const VALID_XML_NAME_START_RANGES: &'static [CodepointRange] = &[
	CodepointRange(':', ':'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{2ff}'),
	CodepointRange('\u{370}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

// XML 1.0 § 2.3 [4a]
const VALID_XML_NAME_RANGES: &'static [CodepointRange] = &[
	CodepointRange(':', ':'),
	CodepointRange('-', '-'),
	CodepointRange('.', '.'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('0', '9'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{b7}', '\u{b7}'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{2ff}'),
	CodepointRange('\u{300}', '\u{36f}'),
	CodepointRange('\u{370}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{203f}', '\u{2040}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

// XML 1.0 § 2.3 [3]
const VALID_XML_SPACE_RANGES: &'static [CodepointRange] = &[
	CodepointRange('\x09', '\x0a'),
	CodepointRange('\x0d', '\x0d'),
	CodepointRange(' ', ' '),
];

impl CodepointRange {
	pub fn contains(&self, c: char) -> bool {
		(self.0 <= c) && (c <= self.1)
	}
}

/// Selects all chars from any of the contained ranges
#[derive(Copy)]
pub struct CodepointRanges(pub &'static [CodepointRange]);

/// Valid non-first characters for an XML Name (XML 1.0 § 2.3 \[4a\])
pub static CLASS_XML_NAME: CodepointRanges = CodepointRanges(VALID_XML_NAME_RANGES);

/// Valid first characters for an XML Name (XML 1.0 § 2.3 \[4\])
pub static CLASS_XML_NAMESTART: CodepointRanges = CodepointRanges(VALID_XML_NAME_START_RANGES);

/// XML whitespace (XML 1.0 § 2.3 \[3\])
pub static CLASS_XML_SPACES: CodepointRanges = CodepointRanges(VALID_XML_SPACE_RANGES);

impl CharSelector for CodepointRange {
	fn select(&self, c: char) -> bool {
		self.contains(c)
	}
}

impl CharSelector for CodepointRanges {
	fn select(&self, c: char) -> bool {
		contained_in_ranges(c, self.0)
	}
}

pub fn contained_in_ranges(c: char, rs: &[CodepointRange]) -> bool {
	rs.iter().any(|r| r.contains(c))
}

impl fmt::Debug for CodepointRanges {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "CodepointRanges(<{} ranges>)", self.0.len())
	}
}

impl Clone for CodepointRanges {
	fn clone(&self) -> Self {
		CodepointRanges(self.0)
	}
}

impl PartialEq for CodepointRanges {
	fn eq(&self, other: &CodepointRanges) -> bool {
		std::ptr::eq(self.0, other.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn namestart_is_subset_of_name() {
		for cp in 0x0..=0x10ffffu32 {
			if let Some(ch) = std::char::from_u32(cp) {
				if CLASS_XML_NAMESTART.select(ch) && !CLASS_XML_NAME.select(ch) {
					panic!("U+{:x} may start a name but may not continue one", cp)
				}
			}
		}
	}

	#[test]
	fn name_only_chars_do_not_start_names() {
		for ch in &['-', '.', '0', '9', '\u{b7}', '\u{300}', '\u{36f}', '\u{203f}', '\u{2040}'] {
			assert!(CLASS_XML_NAME.select(*ch), "{:?}", ch);
			assert!(!CLASS_XML_NAMESTART.select(*ch), "{:?}", ch);
		}
	}

	#[test]
	fn range_edges() {
		assert!(CLASS_XML_NAMESTART.select('\u{fdf0}'));
		assert!(CLASS_XML_NAMESTART.select('\u{fffd}'));
		assert!(!CLASS_XML_NAMESTART.select('\u{fdd0}'));
		assert!(!CLASS_XML_NAMESTART.select('\u{d7}'));
		assert!(!CLASS_XML_NAMESTART.select('\u{f7}'));
		assert!(!CLASS_XML_NAMESTART.select('\u{37e}'));
		assert!(!CLASS_XML_NAMESTART.select('\u{3000}'));
		assert!(CLASS_XML_NAMESTART.select('\u{effff}'));
		assert!(!CLASS_XML_NAMESTART.select('\u{f0000}'));
		assert!(CLASS_XML_NAMESTART.select('\u{4e2d}'));
	}

	#[test]
	fn spaces_are_exactly_the_s_production() {
		let mut selected = Vec::new();
		for cp in 0x0..=0x10ffffu32 {
			if let Some(ch) = std::char::from_u32(cp) {
				if CLASS_XML_SPACES.select(ch) {
					selected.push(ch);
				}
			}
		}
		assert_eq!(selected, vec!['\t', '\n', '\r', ' ']);
	}
}
