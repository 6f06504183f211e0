/*!
# Namespace prefix resolution

The [`NamespaceResolver`] watches the tags the tokenizer emits and keeps the
`xmlns:prefix` declarations which are in scope at the current nesting depth.
It does not check that start and end tags match; depth simply follows the
sequence of start and end tags.
*/
#[cfg(not(feature = "mt"))]
use std::rc::Rc;
#[cfg(feature = "mt")]
use std::sync::Arc;

use log::trace;

use crate::context::Context;
use crate::{Attributes, Name};

/// Wrapper pointer around namespace URIs
///
/// In builds with the `mt` feature, this is a [`Arc`]. In non-`mt` builds,
/// this is a [`std::rc::Rc`]
#[cfg(feature = "mt")]
pub type RcPtr<T> = Arc<T>;
/// Wrapper pointer around namespace URIs
///
/// In builds with the `mt` feature, this is a [`std::sync::Arc`].
/// In non-`mt` builds, this is a [`Rc`].
#[cfg(not(feature = "mt"))]
pub type RcPtr<T> = Rc<T>;

/// Shared namespace URI
pub type NamespaceName = RcPtr<str>;

/// XML core namespace URI (for the `xml:` prefix)
pub const XMLNS_XML: &'static str = "http://www.w3.org/XML/1998/namespace";

const XMLNS_ATTR: &'static str = "xmlns";
const XMLNS_PREFIX: &'static str = "xmlns:";
const XML_PREFIX: &'static str = "xml";

#[derive(Debug, Clone)]
struct Binding {
	/// `None` for the default namespace
	prefix: Option<Name>,
	/// `None` if the declaration had an empty value
	uri: Option<NamespaceName>,
	depth: usize,
}

/// Split `name` at its first colon into prefix and local part.
pub fn split_prefix(name: &str) -> (Option<&str>, &str) {
	match name.find(':') {
		Some(idx) => (Some(&name[..idx]), &name[idx + 1..]),
		None => (None, name),
	}
}

/**
# Depth-scoped prefix bindings

Bindings live in one flat stack, searched from the top. A binding declared on
an element is recorded with the depth of that element's content and popped as
soon as the depth drops below it again.
*/
pub struct NamespaceResolver {
	ctx: RcPtr<Context>,
	xml_namespace: NamespaceName,
	bindings: Vec<Binding>,
	depth: usize,
	enabled: bool,
	default_namespace: bool,
}

impl NamespaceResolver {
	/// Create a new namespace resolver with its own (unshared) [`Context`].
	pub fn new() -> Self {
		Self::with_context(RcPtr::new(Context::new()))
	}

	/// Create a new namespace resolver with the given [`Context`].
	pub fn with_context(ctx: RcPtr<Context>) -> Self {
		let xml_namespace = ctx.intern(XMLNS_XML);
		Self {
			ctx,
			xml_namespace,
			bindings: Vec::new(),
			depth: 0,
			enabled: true,
			default_namespace: false,
		}
	}

	/// Enable or disable prefix resolution. Depth is tracked either way.
	pub fn set_enabled(&mut self, enabled: bool) {
		self.enabled = enabled;
	}

	/// Let plain `xmlns` attributes declare a namespace for unprefixed
	/// element names.
	pub fn set_default_namespace(&mut self, enabled: bool) {
		self.default_namespace = enabled;
	}

	/// Number of currently open elements.
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Find the URI bound to `prefix` (`None` for the default namespace).
	pub fn lookup(&self, prefix: Option<&str>) -> Option<NamespaceName> {
		if !self.enabled {
			return None;
		}
		match prefix {
			Some(XML_PREFIX) => return Some(self.xml_namespace.clone()),
			None if !self.default_namespace => return None,
			_ => (),
		}
		self.bindings
			.iter()
			.rev()
			.find(|b| b.prefix.as_deref() == prefix)
			.and_then(|b| b.uri.clone())
	}

	fn resolve(&self, name: &str) -> Option<NamespaceName> {
		let (prefix, _) = split_prefix(name);
		self.lookup(prefix)
	}

	fn declare(&mut self, attrs: &Attributes) {
		if !self.enabled {
			return;
		}
		let depth = self.depth + 1;
		for (key, value) in attrs.iter() {
			let prefix = if let Some(local) = key.strip_prefix(XMLNS_PREFIX) {
				Some(Name::from(local))
			} else if self.default_namespace && key.as_str() == XMLNS_ATTR {
				None
			} else {
				continue;
			};
			let uri = if value.is_empty() {
				None
			} else {
				Some(self.ctx.intern(value))
			};
			trace!("binding prefix {:?} to {:?} at depth {}", prefix, uri, depth);
			self.bindings.push(Binding { prefix, uri, depth });
		}
	}

	fn unwind(&mut self) {
		while let Some(top) = self.bindings.last() {
			if top.depth <= self.depth {
				break;
			}
			trace!("dropping binding of prefix {:?} at depth {}", top.prefix, top.depth);
			self.bindings.pop();
		}
	}

	/// Process a start tag. Returns the element's namespace URI and depth.
	pub fn start_tag(&mut self, name: &str, attrs: &Attributes) -> (Option<NamespaceName>, usize) {
		self.declare(attrs);
		let namespace = self.resolve(name);
		let depth = self.depth;
		self.depth += 1;
		(namespace, depth)
	}

	/// Process a self-closing tag. Its declarations go out of scope
	/// immediately.
	pub fn empty_tag(&mut self, name: &str, attrs: &Attributes) -> (Option<NamespaceName>, usize) {
		self.declare(attrs);
		let namespace = self.resolve(name);
		self.unwind();
		(namespace, self.depth)
	}

	/// Process an end tag. The name is resolved against the bindings of the
	/// element being closed.
	pub fn end_tag(&mut self, name: &str) -> (Option<NamespaceName>, usize) {
		let namespace = self.resolve(name);
		self.depth = self.depth.saturating_sub(1);
		self.unwind();
		(namespace, self.depth)
	}
}

impl Default for NamespaceResolver {
	fn default() -> Self {
		Self::new()
	}
}
