/*!
# Character classes for XML-like markup

This is a supplementary crate for `xmltok`. It holds the codepoint tables of
the XML 1.0 `NameStartChar`, `NameChar` and `S` productions and a few
predicates built on them.
*/
use std::fmt;

pub mod selectors;

use selectors::CharSelector;

/**
Error condition from validating an XML string.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// A Name was empty.
	EmptyName,
	/// An invalid character was encountered.
	///
	/// This variant contains the character as data.
	InvalidChar(char),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::EmptyName => f.write_str("Name must not be empty"),
			Self::InvalidChar(c) => write!(f, "character U+{:04x} is not allowed", *c as u32),
		}
	}
}

impl std::error::Error for Error {}

/// Return true if `c` may start an XML name (XML 1.0 § 2.3 \[4\]).
#[inline]
pub fn is_name_start_char(c: char) -> bool {
	selectors::CLASS_XML_NAMESTART.select(c)
}

/// Return true if `c` may continue an XML name (XML 1.0 § 2.3 \[4a\]).
#[inline]
pub fn is_name_char(c: char) -> bool {
	selectors::CLASS_XML_NAME.select(c)
}

/// Return true if `c` is XML whitespace (XML 1.0 § 2.3 \[3\]).
#[inline]
pub fn is_space(c: char) -> bool {
	selectors::CLASS_XML_SPACES.select(c)
}

/**
Check whether a str is a valid XML 1.0 Name

# Example

```rust
use xmltok_validation::{validate_name, Error};

assert!(validate_name("foobar").is_ok());
assert!(validate_name("foo:bar").is_ok());
assert!(matches!(validate_name("foo bar"), Err(Error::InvalidChar(' '))));
assert!(matches!(validate_name(""), Err(Error::EmptyName)));
```
*/
pub fn validate_name(s: &str) -> Result<(), Error> {
	let mut chars = s.chars();
	match chars.next() {
		// must have at least one char
		None => return Err(Error::EmptyName),
		Some(c) => {
			if !is_name_start_char(c) {
				return Err(Error::InvalidChar(c));
			}
		}
	}
	for ch in chars {
		if !is_name_char(ch) {
			return Err(Error::InvalidChar(ch));
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_name_smoketest() {
		assert!(validate_name("foobar").is_ok());
		assert!(validate_name("foo:bar").is_ok());
		assert!(validate_name("_x-1.2").is_ok());
		assert_eq!(validate_name(""), Err(Error::EmptyName));
		assert_eq!(validate_name("0bad"), Err(Error::InvalidChar('0')));
		assert_eq!(validate_name("foo bar baz http://<xyz>"), Err(Error::InvalidChar(' ')));
		assert!(validate_name("\u{ffff}").is_err());
	}

	#[test]
	fn test_predicates() {
		assert!(is_name_start_char('a'));
		assert!(is_name_start_char(':'));
		assert!(!is_name_start_char('-'));
		assert!(is_name_char('-'));
		assert!(is_space('\r'));
		assert!(!is_space('\u{a0}'));
	}
}
