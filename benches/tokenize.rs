use criterion::{black_box, criterion_group, criterion_main, Criterion};

use xmltok::{EventCollector, ParseStatus, Sink, Tokenizer};

static STANZA: &'static str = r#"<message xmlns='jabber:client' xmlns:x='urn:example:x' to='romeo@example.net'
from='juliet@example.com/balcony' type='chat' id='m&#x31;'><body>Wherefore art thou, Romeo? &amp;
&lt;3</body><x:thread parent='e0ffe42b28561960c6b12b944a092794b9683a38'>0e3141cd80894871a68e6fe6b1ec56fa</x:thread>
<!-- delivery receipts --><request xmlns='urn:xmpp:receipts'/><?pi some data?></message>
"#;

static BROKEN: &'static str = "<a x='1' x='2'>text<0bad>&#0;</a b='c'><!DOCTYPE x><! oops><a/ ></ a>\n";

/// Sink which only counts events.
#[derive(Default)]
struct Counter(usize);

impl Sink for Counter {
	fn on_data(&mut self, _: String) -> xmltok::Control {
		self.0 += 1;
		xmltok::Control::Continue
	}

	fn on_tag_start(
		&mut self,
		_: xmltok::Name,
		_: xmltok::Attributes,
		_: Option<xmltok::NamespaceName>,
		_: usize,
	) -> xmltok::Control {
		self.0 += 1;
		xmltok::Control::Continue
	}

	fn on_tag_end(&mut self, _: xmltok::Name, _: Option<xmltok::NamespaceName>, _: usize) -> xmltok::Control {
		self.0 += 1;
		xmltok::Control::Continue
	}
}

fn short_document(c: &mut Criterion) {
	c.bench_function("short_document", |bench| {
		let doc = "<?xml version='1.0'?>\n<root xmlns:u='urn:uuid:fab98e86-7c09-477c-889c-0313d9877bb4' a=\"foo\" b='bar'><u:child>with some text</u:child></root>";
		let tokenizer = Tokenizer::new();

		bench.iter(|| {
			let mut sink = EventCollector::new();
			assert_eq!(tokenizer.parse(black_box(doc), &mut sink), ParseStatus::Complete);
		});
	});
}

fn huge_document(c: &mut Criterion) {
	let mut group = c.benchmark_group("huge_document");
	let mut doc = String::from("<stream>");
	for _ in 0..500 {
		doc.push_str(STANZA);
	}
	doc.push_str("</stream>");
	let chars: Vec<char> = doc.chars().collect();
	let tokenizer = Tokenizer::new();

	group.bench_function("collect", |b| {
		b.iter(|| {
			let mut sink = EventCollector::new();
			assert_eq!(tokenizer.parse(black_box(&doc), &mut sink), ParseStatus::Complete);
		});
	});

	group.bench_function("count_predecoded", |b| {
		b.iter(|| {
			let mut sink = Counter::default();
			assert_eq!(tokenizer.parse_chars(black_box(&chars), &mut sink), ParseStatus::Complete);
			sink.0
		});
	});
}

fn recovery(c: &mut Criterion) {
	let mut doc = String::new();
	for _ in 0..500 {
		doc.push_str(BROKEN);
	}
	let tokenizer = Tokenizer::new();

	c.bench_function("recovery", |b| {
		b.iter(|| {
			let mut sink = Counter::default();
			assert_eq!(tokenizer.parse(black_box(&doc), &mut sink), ParseStatus::Complete);
			sink.0
		});
	});
}

criterion_group! {
	name = benches;
	config = Criterion::default().sample_size(100);
	targets = short_document, huge_document, recovery
}
criterion_main!(benches);
