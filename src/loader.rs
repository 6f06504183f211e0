/*!
# Loading documents from the file system

The tokenizer itself only works on text which is already in memory. This
module reads a document from a path (with `~` expanded to the home
directory) and hands it to a [`Tokenizer`]. Load failures are delivered to
the sink like any other diagnostic, at position 0:0.
*/
use std::env;
use std::fs;

use log::debug;

use crate::error::{Diagnostic, Error};
use crate::lexer::{ParseStatus, Position, Tokenizer};
use crate::sink::Sink;

fn expand_with(path: &str, home: Option<String>) -> String {
	let rest = match path.strip_prefix('~') {
		Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
		_ => return path.to_string(),
	};
	match home {
		Some(home) => home + rest,
		None => path.to_string(),
	}
}

/// Expand a leading `~` or `~/` to the value of `$HOME`.
///
/// `~user` forms are left alone, as is everything else if `$HOME` is not
/// set.
pub fn expand_home(path: &str) -> String {
	expand_with(path, env::var("HOME").ok())
}

/// Read the whole document at `path` (after [`expand_home`]).
pub fn load(path: &str) -> Result<String, Error> {
	let path = expand_home(path);
	debug!("loading document from {:?}", path);
	let raw = fs::read(&path).map_err(|e| Error::io(path.clone(), e))?;
	String::from_utf8(raw).map_err(|_| Error::InvalidUtf8 { path })
}

/**
Load the document at `path` and scan it with `tokenizer`.

If the document cannot be loaded, a single diagnostic at 0:0 is delivered to
`sink`, the tokenizer is not run and [`ParseStatus::Failed`] is returned.
*/
pub fn parse_path<S: Sink + ?Sized>(tokenizer: &Tokenizer, path: &str, sink: &mut S) -> ParseStatus {
	match load(path) {
		Ok(text) => tokenizer.parse(&text, sink),
		Err(e) => {
			debug!("failed to load {:?}: {}", path, e);
			let _ = sink.on_error(Diagnostic::new(e, Position::new(0, 0)));
			ParseStatus::Failed
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::path::PathBuf;

	use crate::error::ErrorKind;
	use crate::sink::{Event, EventCollector};

	fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
		let mut path = env::temp_dir();
		path.push(format!("xmltok-{}-{}", std::process::id(), name));
		fs::write(&path, contents).unwrap();
		path
	}

	#[test]
	fn expands_bare_tilde_and_tilde_slash() {
		let home = || Some("/home/me".to_string());
		assert_eq!(expand_with("~", home()), "/home/me");
		assert_eq!(expand_with("~/doc.xml", home()), "/home/me/doc.xml");
		assert_eq!(expand_with("~other/doc.xml", home()), "~other/doc.xml");
		assert_eq!(expand_with("/abs/~/x", home()), "/abs/~/x");
		assert_eq!(expand_with("rel.xml", home()), "rel.xml");
		assert_eq!(expand_with("~/doc.xml", None), "~/doc.xml");
		assert_eq!(expand_with("", home()), "");
	}

	#[test]
	fn parse_path_scans_file_contents() {
		let path = temp_file("ok.xml", b"<doc a='1'>text</doc>");
		let mut sink = EventCollector::new();
		let status = parse_path(&Tokenizer::new(), path.to_str().unwrap(), &mut sink);
		fs::remove_file(&path).unwrap();
		assert_eq!(status, ParseStatus::Complete);
		assert_eq!(sink.events().len(), 3);
		assert_eq!(sink.events()[1], Event::Data("text".to_string()));
	}

	#[test]
	fn missing_file_is_reported_at_origin() {
		let mut path = env::temp_dir();
		path.push(format!("xmltok-{}-does-not-exist.xml", std::process::id()));
		let path = path.to_str().unwrap().to_string();
		let mut sink = EventCollector::new();
		let status = parse_path(&Tokenizer::new(), &path, &mut sink);
		assert_eq!(status, ParseStatus::Failed);
		let events = sink.into_events();
		assert_eq!(events.len(), 1);
		match &events[0] {
			Event::Error(diag) => {
				assert_eq!(diag.position(), Position::new(0, 0));
				assert_eq!(diag.error().kind(), ErrorKind::Load);
				assert!(diag
					.message()
					.starts_with(&format!("could not open file stream '{}'", path)));
			}
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[test]
	fn invalid_utf8_is_a_load_error() {
		let path = temp_file("bad.xml", b"<doc>\xff</doc>");
		let result = load(path.to_str().unwrap());
		fs::remove_file(&path).unwrap();
		match result {
			Err(Error::InvalidUtf8 { .. }) => (),
			other => panic!("unexpected result: {:?}", other),
		}
	}
}
