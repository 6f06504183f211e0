/*!
# Markup tokenizer

The tokenizer walks a fully buffered document one code point at a time and
reports tags, character data and processing instructions to a [`Sink`].

Malformed markup never aborts the scan. When a token turns out to be broken,
the diagnostic is reported, the cursor is rewound to the `<` which opened
the token, and the whole span is scanned again as character data. Only an end
of input in the middle of a markup token is fatal.
*/
use std::mem;

use log::{debug, trace};

use xmltok_validation::{is_name_char, is_name_start_char, is_space};

mod cursor;
mod refs;

pub use cursor::{Checkpoint, Cursor, Position};
pub use refs::{expand_reference, resolve_char_reference, resolve_named_entity};

use crate::context::Context;
use crate::error::{Construct, Diagnostic, Error, ErrorContext};
use crate::namespaces::{NamespaceResolver, RcPtr};
use crate::sink::{Control, Sink};
use crate::{Attributes, Name};

/// Options for a [`Tokenizer`]
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct TokenizerOptions {
	/// Resolve namespace prefixes of tag names (default on).
	pub namespaces: bool,
	/// Treat plain `xmlns` attributes as declaring the namespace of unprefixed
	/// tag names (default off).
	pub default_namespace: bool,
}

impl TokenizerOptions {
	pub fn defaults() -> TokenizerOptions {
		TokenizerOptions {
			namespaces: true,
			default_namespace: false,
		}
	}

	pub fn namespaces<'a>(&'a mut self, v: bool) -> &'a mut TokenizerOptions {
		self.namespaces = v;
		self
	}

	pub fn default_namespace<'a>(&'a mut self, v: bool) -> &'a mut TokenizerOptions {
		self.default_namespace = v;
		self
	}
}

impl Default for TokenizerOptions {
	fn default() -> Self {
		Self::defaults()
	}
}

/// How a call to [`Tokenizer::parse`] ended.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
	/// The whole document was scanned.
	Complete,
	/// The sink returned [`Control::Stop`].
	Stopped,
	/// The document ended inside a markup token. An
	/// [`Error::UnexpectedEof`] diagnostic has been delivered.
	Truncated,
	/// The document could not be loaded and was not scanned at all. See
	/// [`crate::loader::parse_path`].
	Failed,
}

impl ParseStatus {
	pub fn is_complete(&self) -> bool {
		*self == ParseStatus::Complete
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
	Start,
	End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	/// Character data
	Data,
	/// Rewound to a `<` which has to be taken as data
	Recover,
	/// After `<`
	Open,
	/// After `</`
	EndOpen,
	/// Inside a tag name
	Name(TagKind),
	/// Between attributes of a start tag
	Attributes,
	/// Whitespace after the name of an end tag
	EndTagTail,
	/// Inside an attribute name
	Label,
	/// Whitespace between attribute name and `=`
	BeforeEq,
	/// After `=`, awaiting the opening quote
	AfterEq,
	/// Inside a quoted value; carries the delimiter
	Value(char),
	/// After the `/` of a self-closing tag
	SelfClose,
	/// After `<!`
	Bang,
	/// After `<!-`
	BangHyphen,
	/// Keyword of an `<!` declaration, starting at the given position
	Declaration(Position),
	/// Comment body
	Comment,
	/// One `-` in the comment body
	CommentHyphen,
	/// `--` in the comment body; the position is that of the second hyphen
	CommentDoubleHyphen(Position),
	/// After `<?`
	PiOpen,
	/// Inside the target of a processing instruction
	PiTarget,
	/// Whitespace between target and data
	PiSpace,
	/// Processing instruction data
	PiContent,
	/// `?` inside a processing instruction
	PiQuestion,
}

/**
# Restartable markup tokenizer

A `Tokenizer` only carries configuration. Every call to [`Tokenizer::parse`]
scans the given document from scratch with fresh buffers, so a tokenizer may
be reused for any number of documents.

```
use xmltok::{EventCollector, Event, Tokenizer};
let mut sink = EventCollector::new();
let status = Tokenizer::new().parse("<doc>hi</doc>", &mut sink);
assert!(status.is_complete());
assert_eq!(sink.events()[1], Event::Data("hi".to_string()));
```
*/
pub struct Tokenizer {
	opts: TokenizerOptions,
	ctx: RcPtr<Context>,
}

impl Tokenizer {
	/// Create a tokenizer with default options.
	pub fn new() -> Tokenizer {
		Self::with_options(TokenizerOptions::defaults())
	}

	pub fn with_options(opts: TokenizerOptions) -> Tokenizer {
		Self::with_context(opts, RcPtr::new(Context::new()))
	}

	/// Create a tokenizer which interns namespace URIs in a shared
	/// [`Context`].
	pub fn with_context(opts: TokenizerOptions, ctx: RcPtr<Context>) -> Tokenizer {
		Tokenizer { opts, ctx }
	}

	pub fn options(&self) -> &TokenizerOptions {
		&self.opts
	}

	pub fn context(&self) -> &RcPtr<Context> {
		&self.ctx
	}

	/// Scan `text` and deliver all events to `sink`.
	pub fn parse<S: Sink + ?Sized>(&self, text: &str, sink: &mut S) -> ParseStatus {
		let buf: Vec<char> = text.chars().collect();
		self.parse_chars(&buf, sink)
	}

	/// Scan an already decoded sequence of code points.
	pub fn parse_chars<S: Sink + ?Sized>(&self, buf: &[char], sink: &mut S) -> ParseStatus {
		trace!("tokenizing {} code points", buf.len());
		let mut resolver = NamespaceResolver::with_context(self.ctx.clone());
		resolver.set_enabled(self.opts.namespaces);
		resolver.set_default_namespace(self.opts.default_namespace);
		let cursor = Cursor::new(buf);
		Scanner {
			checkpoint: cursor.checkpoint(),
			cursor,
			state: State::Data,
			data: String::new(),
			name: Name::new(),
			label: Name::new(),
			value: String::new(),
			attrs: Attributes::new(),
			deferred: Vec::new(),
			resolver,
			sink,
		}
		.run()
	}
}

impl Default for Tokenizer {
	fn default() -> Self {
		Self::new()
	}
}

/// Per-parse state of a [`Tokenizer`].
struct Scanner<'a, 's, S: Sink + ?Sized> {
	cursor: Cursor<'a>,
	/// Position of the `<` of the current markup token
	checkpoint: Checkpoint,
	state: State,
	data: String,
	/// Tag name, processing instruction target or declaration keyword
	name: Name,
	/// Attribute name
	label: Name,
	/// Attribute value or processing instruction data
	value: String,
	attrs: Attributes,
	/// Reference diagnostics from attribute values of the current tag. They
	/// are delivered with the tag; if the tag is discarded, the rescan as
	/// data reports them again.
	deferred: Vec<Diagnostic>,
	resolver: NamespaceResolver,
	sink: &'s mut S,
}

type StepResult = Result<Control, Diagnostic>;

fn unexpected(ch: char, ctx: ErrorContext, at: Checkpoint) -> Diagnostic {
	Diagnostic::new(Error::UnexpectedChar(ch, ctx), at.position())
}

impl<'a, 's, S: Sink + ?Sized> Scanner<'a, 's, S> {
	fn run(mut self) -> ParseStatus {
		loop {
			let mark = self.cursor.checkpoint();
			let ch = match self.cursor.next() {
				Some(ch) => ch,
				None => return self.finish(),
			};
			let ctl = match self.step(ch, mark) {
				Ok(ctl) => ctl,
				Err(diag) => self.recover(diag),
			};
			if ctl == Control::Stop {
				debug!("sink requested stop at {}", self.cursor.position());
				return ParseStatus::Stopped;
			}
		}
	}

	fn finish(&mut self) -> ParseStatus {
		match self.state {
			State::Data | State::Recover => match self.flush_data() {
				Control::Continue => ParseStatus::Complete,
				Control::Stop => ParseStatus::Stopped,
			},
			state => {
				let pos = self.cursor.position();
				debug!("end of stream at {} in state {:?}", pos, state);
				if self.deliver_deferred() == Control::Stop {
					return ParseStatus::Stopped;
				}
				let _ = self.sink.on_error(Diagnostic::new(Error::UnexpectedEof, pos));
				ParseStatus::Truncated
			}
		}
	}

	/// Report `diag` and rewind to the start of the current markup token.
	fn recover(&mut self, diag: Diagnostic) -> Control {
		debug!(
			"{}; rescanning from {} as data",
			diag,
			self.checkpoint.position()
		);
		let ctl = self.sink.on_error(diag);
		self.name.clear();
		self.label.clear();
		self.value.clear();
		self.attrs.clear();
		self.deferred.clear();
		self.cursor.revert(self.checkpoint);
		self.state = State::Recover;
		ctl
	}

	fn flush_data(&mut self) -> Control {
		if self.data.is_empty() {
			return Control::Continue;
		}
		let data = mem::take(&mut self.data);
		self.sink.on_data(data)
	}

	fn deliver_deferred(&mut self) -> Control {
		for diag in mem::take(&mut self.deferred) {
			if self.sink.on_error(diag) == Control::Stop {
				return Control::Stop;
			}
		}
		Control::Continue
	}

	fn emit_start(&mut self) -> Control {
		if self.deliver_deferred() == Control::Stop {
			return Control::Stop;
		}
		let name = mem::take(&mut self.name);
		let attrs = mem::take(&mut self.attrs);
		let (namespace, depth) = self.resolver.start_tag(&name, &attrs);
		trace!("start tag {:?} at depth {}", name, depth);
		self.state = State::Data;
		self.sink.on_tag_start(name, attrs, namespace, depth)
	}

	fn emit_empty(&mut self) -> Control {
		if self.deliver_deferred() == Control::Stop {
			return Control::Stop;
		}
		let name = mem::take(&mut self.name);
		let attrs = mem::take(&mut self.attrs);
		let (namespace, depth) = self.resolver.empty_tag(&name, &attrs);
		trace!("empty tag {:?} at depth {}", name, depth);
		self.state = State::Data;
		self.sink.on_tag_empty(name, attrs, namespace, depth)
	}

	fn emit_end(&mut self) -> Control {
		let name = mem::take(&mut self.name);
		let (namespace, depth) = self.resolver.end_tag(&name);
		trace!("end tag {:?} at depth {}", name, depth);
		self.state = State::Data;
		self.sink.on_tag_end(name, namespace, depth)
	}

	fn emit_pi(&mut self) -> Control {
		let target = mem::take(&mut self.name);
		let data = mem::take(&mut self.value);
		trace!("processing instruction {:?}", target);
		self.state = State::Data;
		self.sink.on_processing_instruction(target, data)
	}

	fn step(&mut self, ch: char, mark: Checkpoint) -> StepResult {
		match self.state {
			State::Data => match ch {
				'<' => {
					self.checkpoint = mark;
					self.state = State::Open;
					Ok(self.flush_data())
				}
				'&' => match expand_reference(&mut self.cursor, mark.position(), &mut self.data) {
					Ok(()) => Ok(Control::Continue),
					Err(diag) => Ok(self.sink.on_error(diag)),
				},
				ch => {
					self.data.push(ch);
					Ok(Control::Continue)
				}
			},
			State::Recover => {
				debug_assert_eq!(ch, '<');
				self.data.push(ch);
				self.state = State::Data;
				Ok(Control::Continue)
			}
			State::Open => {
				self.state = match ch {
					'/' => State::EndOpen,
					'!' => State::Bang,
					'?' => State::PiOpen,
					ch if is_name_start_char(ch) => {
						self.name.push(ch);
						State::Name(TagKind::Start)
					}
					ch => return Err(unexpected(ch, ErrorContext::AfterLeftAngle, mark)),
				};
				Ok(Control::Continue)
			}
			State::EndOpen => {
				if !is_name_start_char(ch) {
					return Err(unexpected(ch, ErrorContext::EndTag(Name::new()), mark));
				}
				self.name.push(ch);
				self.state = State::Name(TagKind::End);
				Ok(Control::Continue)
			}
			State::Name(kind) => self.step_name(kind, ch, mark),
			State::Attributes => match ch {
				'/' => {
					self.state = State::SelfClose;
					Ok(Control::Continue)
				}
				'>' => Ok(self.emit_start()),
				ch if is_name_start_char(ch) => {
					self.label.push(ch);
					self.state = State::Label;
					Ok(Control::Continue)
				}
				ch if is_space(ch) => Ok(Control::Continue),
				ch => Err(unexpected(ch, ErrorContext::StartTag(self.name.clone()), mark)),
			},
			State::EndTagTail => match ch {
				'>' => Ok(self.emit_end()),
				ch if is_space(ch) => Ok(Control::Continue),
				ch if is_name_start_char(ch) => Err(Diagnostic::new(
					Error::EndTagAttributes(self.name.clone()),
					mark.position(),
				)),
				ch => Err(unexpected(ch, ErrorContext::EndTag(self.name.clone()), mark)),
			},
			State::Label => {
				match ch {
					'=' => self.state = State::AfterEq,
					ch if is_name_char(ch) => self.label.push(ch),
					ch if is_space(ch) => self.state = State::BeforeEq,
					ch => return Err(unexpected(ch, ErrorContext::StartTag(self.name.clone()), mark)),
				}
				Ok(Control::Continue)
			}
			State::BeforeEq => {
				match ch {
					'=' => self.state = State::AfterEq,
					ch if is_space(ch) => (),
					ch => return Err(unexpected(ch, ErrorContext::StartTag(self.name.clone()), mark)),
				}
				Ok(Control::Continue)
			}
			State::AfterEq => {
				match ch {
					'"' | '\'' => self.state = State::Value(ch),
					ch if is_space(ch) => (),
					ch => return Err(unexpected(ch, ErrorContext::StartTag(self.name.clone()), mark)),
				}
				Ok(Control::Continue)
			}
			State::Value(delim) => self.step_value(delim, ch, mark),
			State::SelfClose => match ch {
				'>' => Ok(self.emit_empty()),
				ch => Err(unexpected(ch, ErrorContext::EmptyTag(self.name.clone()), mark)),
			},
			State::Bang => {
				self.state = match ch {
					'-' => State::BangHyphen,
					'[' => {
						return Err(Diagnostic::new(
							Error::Unsupported(Construct::CDataSection),
							mark.position(),
						))
					}
					ch if is_name_start_char(ch) => {
						self.name.push(ch);
						State::Declaration(mark.position())
					}
					ch => return Err(unexpected(ch, ErrorContext::AfterBang, mark)),
				};
				Ok(Control::Continue)
			}
			State::BangHyphen => match ch {
				'-' => {
					self.state = State::Comment;
					Ok(Control::Continue)
				}
				ch => Err(unexpected(ch, ErrorContext::AfterBangHyphen, mark)),
			},
			State::Declaration(start) => {
				if is_name_char(ch) {
					self.name.push(ch);
					return Ok(Control::Continue);
				}
				let keyword = mem::take(&mut self.name);
				Err(Diagnostic::new(
					Error::Unsupported(Construct::Declaration(keyword)),
					start,
				))
			}
			State::Comment => {
				if ch == '-' {
					self.state = State::CommentHyphen;
				}
				Ok(Control::Continue)
			}
			State::CommentHyphen => {
				self.state = match ch {
					'-' => State::CommentDoubleHyphen(mark.position()),
					_ => State::Comment,
				};
				Ok(Control::Continue)
			}
			State::CommentDoubleHyphen(second) => match ch {
				'>' => {
					trace!("skipped comment");
					self.state = State::Data;
					Ok(Control::Continue)
				}
				_ => Err(Diagnostic::new(Error::DoubleHyphenInComment, second)),
			},
			State::PiOpen => {
				if !is_name_start_char(ch) {
					return Err(unexpected(ch, ErrorContext::AfterQuestionMark, mark));
				}
				self.name.push(ch);
				self.state = State::PiTarget;
				Ok(Control::Continue)
			}
			State::PiTarget => {
				match ch {
					'?' => self.state = State::PiQuestion,
					ch if is_name_char(ch) => self.name.push(ch),
					ch if is_space(ch) => self.state = State::PiSpace,
					ch => {
						return Err(unexpected(
							ch,
							ErrorContext::ProcessingInstruction(self.name.clone()),
							mark,
						))
					}
				}
				Ok(Control::Continue)
			}
			State::PiSpace | State::PiContent => {
				match ch {
					'?' => self.state = State::PiQuestion,
					ch if is_space(ch) && self.state == State::PiSpace => (),
					ch => {
						self.value.push(ch);
						self.state = State::PiContent;
					}
				}
				Ok(Control::Continue)
			}
			State::PiQuestion => match ch {
				'>' => Ok(self.emit_pi()),
				'?' => {
					self.value.push('?');
					Ok(Control::Continue)
				}
				ch => {
					self.value.push('?');
					self.value.push(ch);
					self.state = State::PiContent;
					Ok(Control::Continue)
				}
			},
		}
	}

	fn step_name(&mut self, kind: TagKind, ch: char, mark: Checkpoint) -> StepResult {
		match (kind, ch) {
			(TagKind::Start, '>') => Ok(self.emit_start()),
			(TagKind::End, '>') => Ok(self.emit_end()),
			(TagKind::Start, '/') => {
				self.state = State::SelfClose;
				Ok(Control::Continue)
			}
			(_, ch) if is_name_char(ch) => {
				self.name.push(ch);
				Ok(Control::Continue)
			}
			(TagKind::Start, ch) if is_space(ch) => {
				self.state = State::Attributes;
				Ok(Control::Continue)
			}
			(TagKind::End, ch) if is_space(ch) => {
				self.state = State::EndTagTail;
				Ok(Control::Continue)
			}
			(TagKind::Start, ch) => Err(unexpected(ch, ErrorContext::StartTag(self.name.clone()), mark)),
			(TagKind::End, ch) => Err(unexpected(ch, ErrorContext::EndTag(self.name.clone()), mark)),
		}
	}

	fn step_value(&mut self, delim: char, ch: char, mark: Checkpoint) -> StepResult {
		if ch == delim {
			if self.attrs.contains_key(&self.label) {
				return Err(Diagnostic::new(
					Error::DuplicateAttribute(mem::take(&mut self.label)),
					mark.position(),
				));
			}
			let label = mem::take(&mut self.label);
			let value = mem::take(&mut self.value);
			self.attrs.insert(label, value);
			self.state = State::Attributes;
			return Ok(Control::Continue);
		}
		if ch != '&' {
			self.value.push(ch);
			return Ok(Control::Continue);
		}
		match expand_reference(&mut self.cursor, mark.position(), &mut self.value) {
			Ok(()) => Ok(Control::Continue),
			// the end of stream diagnostic follows right away
			Err(diag) if *diag.error() == Error::UnterminatedReference => Ok(Control::Continue),
			Err(diag) => {
				self.deferred.push(diag);
				Ok(Control::Continue)
			}
		}
	}
}
