use std::fmt;

/// Zero-based line and column of a code point in the document.
///
/// Columns count code points, not bytes or grapheme clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
	pub line: usize,
	pub column: usize,
}

impl Position {
	pub const fn new(line: usize, column: usize) -> Position {
		Position { line, column }
	}

	/// Move past `ch`.
	#[inline]
	pub fn advance(&mut self, ch: char) {
		if ch == '\n' {
			self.line += 1;
			self.column = 0;
		} else {
			self.column += 1;
		}
	}
}

impl fmt::Display for Position {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// Saved [`Cursor`] state, see [`Cursor::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
	offset: usize,
	position: Position,
}

impl Checkpoint {
	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn position(&self) -> Position {
		self.position
	}
}

/**
# Rewindable view over a buffered document

The cursor is a plain value: copying it is how lookahead is done, and
[`Cursor::revert`] restores offset and position together.
*/
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
	buf: &'a [char],
	offset: usize,
	position: Position,
}

impl<'a> Cursor<'a> {
	pub fn new(buf: &'a [char]) -> Cursor<'a> {
		Cursor {
			buf,
			offset: 0,
			position: Position::default(),
		}
	}

	/// Consume and return the next code point.
	#[inline]
	pub fn next(&mut self) -> Option<char> {
		let ch = *self.buf.get(self.offset)?;
		self.offset += 1;
		self.position.advance(ch);
		Some(ch)
	}

	/// Return the next code point without consuming it.
	#[inline]
	pub fn peek(&self) -> Option<char> {
		self.buf.get(self.offset).copied()
	}

	/// Position of the code point which [`Cursor::next`] returns next.
	pub fn position(&self) -> Position {
		self.position
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn is_eof(&self) -> bool {
		self.offset >= self.buf.len()
	}

	pub fn checkpoint(&self) -> Checkpoint {
		Checkpoint {
			offset: self.offset,
			position: self.position,
		}
	}

	pub fn revert(&mut self, cp: Checkpoint) {
		debug_assert!(cp.offset <= self.buf.len());
		self.offset = cp.offset;
		self.position = cp.position;
	}
}

impl fmt::Debug for Cursor<'_> {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Cursor")
			.field("offset", &self.offset)
			.field("len", &self.buf.len())
			.field("position", &self.position)
			.finish()
	}
}
