#[macro_use]
extern crate afl;
extern crate xmltok;

use xmltok::{Event, EventCollector, ParseStatus, Tokenizer};

fn tokenize(tokenizer: &Tokenizer, doc: &str) -> (Vec<Event>, ParseStatus) {
	let mut sink = EventCollector::new();
	let status = tokenizer.parse(doc, &mut sink);
	(sink.into_events(), status)
}

fn main() {
	fuzz!(|data: &[u8]| {
		let doc = match std::str::from_utf8(data) {
			Ok(doc) => doc,
			Err(_) => return,
		};
		let tokenizer = Tokenizer::new();
		let (first, status) = tokenize(&tokenizer, doc);
		let (second, _) = tokenize(&tokenizer, doc);
		assert_eq!(first, second);

		let fatal = first.iter().filter(|ev| match ev {
			Event::Error(diag) => diag.error().is_fatal(),
			_ => false,
		}).count();
		match status {
			ParseStatus::Truncated => {
				assert_eq!(fatal, 1);
				assert!(matches!(first.last(), Some(Event::Error(_))));
			}
			_ => assert_eq!(fatal, 0),
		}
	});
}
