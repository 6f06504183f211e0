/*!
# Forgiving XML-like markup tokenizer

This crate scans XML-like markup into a stream of events: start tags, empty
tags, end tags, character data and processing instructions. It is a lexical
tokenizer, not a validating parser: end tags are not matched against start
tags, and broken markup is reported and then kept as plain text instead of
aborting the scan.

## Features

* Character and predefined entity references are expanded in text and
  attribute values
* Comments are recognized and skipped
* Processing instructions are reported with their target and raw data
* Namespace prefixes of tag names are resolved against `xmlns:` declarations
* Every diagnostic carries the exact line and column (in code points)
* Sinks can stop the scan early

## Restrictions

* No DTDs and no declarations (`<!DOCTYPE ...>` is reported as unsupported)
* No CDATA sections
* No custom entities
* The whole document has to be in memory

## Example

```
use xmltok::{Event, EventCollector, Tokenizer};
let mut sink = EventCollector::new();
let status = Tokenizer::new().parse("<hello a='1'>World!</hello>", &mut sink);
assert!(status.is_complete());
for ev in sink.events() {
	println!("got event: {:?}", ev);
}
assert_eq!(sink.events()[1], Event::Data("World!".to_string()));
```

## Recovery

When a markup token turns out to be malformed, the tokenizer reports the
problem through [`Sink::on_error`] and then rewinds to the `<` which opened the
token. Everything from there on is scanned again as character data, so no
part of the input is silently lost:

```
use xmltok::{Event, EventCollector};
let mut sink = EventCollector::new();
let _ = xmltok::parse("<0bad>", &mut sink);
let events = sink.into_events();
match &events[0] {
	Event::Error(diag) => {
		assert_eq!(diag.message(), "unexpected '0' after left angle bracket '<'");
		assert_eq!((diag.line(), diag.column()), (0, 1));
	}
	other => panic!("unexpected event: {:?}", other),
}
assert_eq!(events[1], Event::Data("<0bad>".to_string()));
```

## Feature flags

* `mt`: namespace URIs are shared via [`std::sync::Arc`] instead of
  [`std::rc::Rc`].
* `shared_ns`: namespace URIs are deduplicated in a [`Context`], which may be
  shared between tokenizers.
*/
use std::collections::HashMap;

mod context;
pub mod error;
pub mod lexer;
pub mod loader;
pub mod namespaces;
pub mod sink;


/// Tag, attribute and processing instruction target names.
pub type Name = smartstring::alias::String;

/// Attributes of a single tag, keyed by their (unresolved) name.
pub type Attributes = HashMap<Name, String>;

#[doc(inline)]
pub use context::Context;
#[doc(inline)]
pub use error::{Diagnostic, Error, ErrorContext, ErrorKind};
#[doc(inline)]
pub use lexer::{ParseStatus, Position, Tokenizer, TokenizerOptions};
#[doc(inline)]
pub use loader::parse_path;
#[doc(inline)]
pub use namespaces::{NamespaceName, NamespaceResolver, RcPtr, XMLNS_XML};
#[doc(inline)]
pub use sink::{Control, Event, EventCollector, FnSink, Sink};

/// Crate version, as recorded in the package metadata.
pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

/// Scan `text` with a default [`Tokenizer`].
pub fn parse<S: Sink + ?Sized>(text: &str, sink: &mut S) -> ParseStatus {
	Tokenizer::new().parse(text, sink)
}
