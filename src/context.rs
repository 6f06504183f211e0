use std::fmt;

#[cfg(all(feature = "shared_ns", feature = "mt"))]
use std::sync::{Mutex, MutexGuard, Weak};
#[cfg(all(feature = "shared_ns", not(feature = "mt")))]
use std::cell::{RefCell, RefMut};
#[cfg(all(feature = "shared_ns", not(feature = "mt")))]
use std::rc::Weak;

use crate::namespaces::RcPtr;

#[cfg(feature = "shared_ns")]
type UriWeakSet = weak_table::WeakHashSet<Weak<str>>;

/**
# Shared context for multiple tokenizers

This context allows tokenizers to share namespace URIs. Documents processed by
the same application tend to use the same handful of namespaces; with the
`shared_ns` feature, each distinct URI is stored once and handed out as a
refcounted pointer.

Even though the context is internally mutable, it can safely be shared with
an immutable reference between tokenizers. If the crate is built with the `mt`
feature, the Context is Send and Sync, otherwise it is neither.
*/
pub struct Context {
	#[cfg(all(feature = "shared_ns", feature = "mt"))]
	nss: Mutex<UriWeakSet>,
	#[cfg(all(feature = "shared_ns", not(feature = "mt")))]
	nss: RefCell<UriWeakSet>,
}

impl Context {
	/// Create a new context
	pub fn new() -> Context {
		Context {
			#[cfg(all(feature = "shared_ns", feature = "mt"))]
			nss: Mutex::new(weak_table::WeakHashSet::new()),
			#[cfg(all(feature = "shared_ns", not(feature = "mt")))]
			nss: RefCell::new(weak_table::WeakHashSet::new()),
		}
	}

	#[cfg(all(feature = "shared_ns", feature = "mt"))]
	fn lock_nss<'a>(&'a self) -> MutexGuard<'a, UriWeakSet> {
		// a panic while holding the lock cannot leave the set inconsistent
		match self.nss.lock() {
			Ok(guard) => guard,
			Err(poisoned) => poisoned.into_inner(),
		}
	}

	#[cfg(all(feature = "shared_ns", not(feature = "mt")))]
	fn lock_nss<'a>(&'a self) -> RefMut<'a, UriWeakSet> {
		self.nss.borrow_mut()
	}

	/// Intern a namespace URI
	///
	/// When the last reference to the returned pointer expires, the string
	/// will be lazily removed from the internal storage.
	///
	/// To force expiry, call [`Context::release_temporaries`].
	pub fn intern(&self, uri: &str) -> RcPtr<str> {
		#[cfg(feature = "shared_ns")]
		{
			let mut nss = self.lock_nss();
			return match nss.get(uri) {
				Some(ptr) => ptr,
				None => {
					let ptr: RcPtr<str> = RcPtr::from(uri);
					nss.insert(ptr.clone());
					ptr
				}
			};
		}
		#[cfg(not(feature = "shared_ns"))]
		return RcPtr::from(uri);
	}

	/// Remove all unreferenced strings from storage and shrink the storage to
	/// fit the requirements.
	pub fn release_temporaries(&self) {
		#[cfg(feature = "shared_ns")]
		{
			let mut nss = self.lock_nss();
			nss.remove_expired();
			nss.shrink_to_fit();
		}
	}

	/// Return the number of URIs interned.
	///
	/// Returns zero if built without `shared_ns`. This count includes strings
	/// which are unreferenced and which would be removed before the next
	/// reallocation.
	pub fn len(&self) -> usize {
		#[cfg(feature = "shared_ns")]
		{
			self.lock_nss().len()
		}
		#[cfg(not(feature = "shared_ns"))]
		0
	}
}

impl Default for Context {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Context {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		let mut f = f.debug_struct("Context");
		f.field("instance", &(self as *const Context));
		#[cfg(feature = "shared_ns")]
		{
			let nss = self.lock_nss();
			f.field("nss.capacity()", &nss.capacity())
				.field("nss.length()", &nss.len());
		}
		f.finish()
	}
}
