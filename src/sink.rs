/*!
# Event delivery

The tokenizer pushes everything it finds into a [`Sink`], synchronously and
in document order. [`Event`] is the owned, enum form of the same callbacks,
used by the [`EventCollector`] and [`FnSink`] adapters.
*/
use crate::error::Diagnostic;
use crate::namespaces::NamespaceName;
use crate::{Attributes, Name};

/// Answer of a [`Sink`] callback.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
	/// Keep scanning.
	Continue,
	/// Stop scanning right after this callback. No further callbacks are
	/// made.
	Stop,
}

/**
# Receiver of tokenizer events

All methods have default implementations which drop the event and continue,
so a sink only needs to implement what it is interested in.

A sink must not call back into the tokenizer which is driving it.

## Order of diagnostics

Events arrive in document order, with two exceptions caused by buffering:

* Character data is delivered as one event when the next `<` (or the end of
  input) is reached. Reference errors inside that data are reported as they
  are found, so they arrive before the `on_data` call carrying their text.
* Reference errors inside attribute values are held until the tag is
  complete and then reported right before it. If the tag turns out to be
  malformed, its error is reported first and the tag text is rescanned as
  character data. The rescan reports each of those reference errors once,
  at its original position, which is earlier than the tag error.
*/
pub trait Sink {
	/// Character data, with references expanded. Never empty.
	fn on_data(&mut self, data: String) -> Control {
		let _ = data;
		Control::Continue
	}

	/// A start tag such as `<doc a='1'>`.
	///
	/// `depth` is the number of enclosing open elements.
	fn on_tag_start(
		&mut self,
		name: Name,
		attrs: Attributes,
		namespace: Option<NamespaceName>,
		depth: usize,
	) -> Control {
		let _ = (name, attrs, namespace, depth);
		Control::Continue
	}

	/// A self-closing tag such as `<doc/>`.
	fn on_tag_empty(
		&mut self,
		name: Name,
		attrs: Attributes,
		namespace: Option<NamespaceName>,
		depth: usize,
	) -> Control {
		let _ = (name, attrs, namespace, depth);
		Control::Continue
	}

	/// An end tag such as `</doc>`.
	///
	/// `depth` is the number of elements still open after this one closed.
	fn on_tag_end(&mut self, name: Name, namespace: Option<NamespaceName>, depth: usize) -> Control {
		let _ = (name, namespace, depth);
		Control::Continue
	}

	/// A processing instruction `<?target data?>`.
	fn on_processing_instruction(&mut self, target: Name, data: String) -> Control {
		let _ = (target, data);
		Control::Continue
	}

	/// A diagnostic. Unless the error is fatal, scanning goes on afterwards.
	fn on_error(&mut self, diagnostic: Diagnostic) -> Control {
		let _ = diagnostic;
		Control::Continue
	}
}

impl<S: Sink + ?Sized> Sink for &mut S {
	fn on_data(&mut self, data: String) -> Control {
		(**self).on_data(data)
	}

	fn on_tag_start(
		&mut self,
		name: Name,
		attrs: Attributes,
		namespace: Option<NamespaceName>,
		depth: usize,
	) -> Control {
		(**self).on_tag_start(name, attrs, namespace, depth)
	}

	fn on_tag_empty(
		&mut self,
		name: Name,
		attrs: Attributes,
		namespace: Option<NamespaceName>,
		depth: usize,
	) -> Control {
		(**self).on_tag_empty(name, attrs, namespace, depth)
	}

	fn on_tag_end(&mut self, name: Name, namespace: Option<NamespaceName>, depth: usize) -> Control {
		(**self).on_tag_end(name, namespace, depth)
	}

	fn on_processing_instruction(&mut self, target: Name, data: String) -> Control {
		(**self).on_processing_instruction(target, data)
	}

	fn on_error(&mut self, diagnostic: Diagnostic) -> Control {
		(**self).on_error(diagnostic)
	}
}

/// One [`Sink`] callback as a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	StartTag {
		name: Name,
		attrs: Attributes,
		namespace: Option<NamespaceName>,
		depth: usize,
	},
	EmptyTag {
		name: Name,
		attrs: Attributes,
		namespace: Option<NamespaceName>,
		depth: usize,
	},
	EndTag {
		name: Name,
		namespace: Option<NamespaceName>,
		depth: usize,
	},
	Data(String),
	ProcessingInstruction {
		target: Name,
		data: String,
	},
	Error(Diagnostic),
}

impl Event {
	/// Feed this event into `sink`.
	pub fn dispatch<S: Sink + ?Sized>(self, sink: &mut S) -> Control {
		match self {
			Self::StartTag {
				name,
				attrs,
				namespace,
				depth,
			} => sink.on_tag_start(name, attrs, namespace, depth),
			Self::EmptyTag {
				name,
				attrs,
				namespace,
				depth,
			} => sink.on_tag_empty(name, attrs, namespace, depth),
			Self::EndTag { name, namespace, depth } => sink.on_tag_end(name, namespace, depth),
			Self::Data(data) => sink.on_data(data),
			Self::ProcessingInstruction { target, data } => sink.on_processing_instruction(target, data),
			Self::Error(diagnostic) => sink.on_error(diagnostic),
		}
	}
}

/// Adapter which turns every callback into an [`Event`] for a closure.
pub struct FnSink<F: FnMut(Event) -> Control>(pub F);

impl<F: FnMut(Event) -> Control> Sink for FnSink<F> {
	fn on_data(&mut self, data: String) -> Control {
		(self.0)(Event::Data(data))
	}

	fn on_tag_start(
		&mut self,
		name: Name,
		attrs: Attributes,
		namespace: Option<NamespaceName>,
		depth: usize,
	) -> Control {
		(self.0)(Event::StartTag {
			name,
			attrs,
			namespace,
			depth,
		})
	}

	fn on_tag_empty(
		&mut self,
		name: Name,
		attrs: Attributes,
		namespace: Option<NamespaceName>,
		depth: usize,
	) -> Control {
		(self.0)(Event::EmptyTag {
			name,
			attrs,
			namespace,
			depth,
		})
	}

	fn on_tag_end(&mut self, name: Name, namespace: Option<NamespaceName>, depth: usize) -> Control {
		(self.0)(Event::EndTag { name, namespace, depth })
	}

	fn on_processing_instruction(&mut self, target: Name, data: String) -> Control {
		(self.0)(Event::ProcessingInstruction { target, data })
	}

	fn on_error(&mut self, diagnostic: Diagnostic) -> Control {
		(self.0)(Event::Error(diagnostic))
	}
}

/// Sink which records all events in a vector.
#[derive(Debug, Default, Clone)]
pub struct EventCollector {
	events: Vec<Event>,
	limit: Option<usize>,
}

impl EventCollector {
	pub fn new() -> EventCollector {
		Self::default()
	}

	/// Collect at most `limit` events, then ask the tokenizer to stop.
	pub fn with_limit(limit: usize) -> EventCollector {
		EventCollector {
			events: Vec::new(),
			limit: Some(limit),
		}
	}

	pub fn events(&self) -> &[Event] {
		&self.events
	}

	pub fn into_events(self) -> Vec<Event> {
		self.events
	}

	fn push(&mut self, ev: Event) -> Control {
		self.events.push(ev);
		match self.limit {
			Some(limit) if self.events.len() >= limit => Control::Stop,
			_ => Control::Continue,
		}
	}
}

impl Sink for EventCollector {
	fn on_data(&mut self, data: String) -> Control {
		self.push(Event::Data(data))
	}

	fn on_tag_start(
		&mut self,
		name: Name,
		attrs: Attributes,
		namespace: Option<NamespaceName>,
		depth: usize,
	) -> Control {
		self.push(Event::StartTag {
			name,
			attrs,
			namespace,
			depth,
		})
	}

	fn on_tag_empty(
		&mut self,
		name: Name,
		attrs: Attributes,
		namespace: Option<NamespaceName>,
		depth: usize,
	) -> Control {
		self.push(Event::EmptyTag {
			name,
			attrs,
			namespace,
			depth,
		})
	}

	fn on_tag_end(&mut self, name: Name, namespace: Option<NamespaceName>, depth: usize) -> Control {
		self.push(Event::EndTag { name, namespace, depth })
	}

	fn on_processing_instruction(&mut self, target: Name, data: String) -> Control {
		self.push(Event::ProcessingInstruction { target, data })
	}

	fn on_error(&mut self, diagnostic: Diagnostic) -> Control {
		self.push(Event::Error(diagnostic))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn collector_stops_at_limit() {
		let mut sink = EventCollector::with_limit(2);
		assert_eq!(sink.on_data("a".to_string()), Control::Continue);
		assert_eq!(sink.on_data("b".to_string()), Control::Stop);
		assert_eq!(sink.events().len(), 2);
	}

	#[test]
	fn dispatch_round_trips_through_fn_sink() {
		let mut seen = Vec::new();
		{
			let mut sink = FnSink(|ev| {
				seen.push(ev);
				Control::Continue
			});
			let ev = Event::EndTag {
				name: "doc".into(),
				namespace: None,
				depth: 0,
			};
			assert_eq!(ev.dispatch(&mut sink), Control::Continue);
		}
		assert_eq!(
			seen,
			vec![Event::EndTag {
				name: "doc".into(),
				namespace: None,
				depth: 0
			}]
		);
	}

	#[test]
	fn default_methods_continue() {
		struct Nothing;
		impl Sink for Nothing {}
		let mut sink = Nothing;
		assert_eq!(sink.on_data("x".to_string()), Control::Continue);
		assert_eq!(sink.on_processing_instruction("pi".into(), String::new()), Control::Continue);
	}
}
