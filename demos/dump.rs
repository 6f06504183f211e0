use std::env;
use std::process;

use xmltok::{Control, Event, FnSink, ParseStatus, Tokenizer, TokenizerOptions};

fn main() {
	let mut args = env::args().skip(1);
	let path = match args.next() {
		Some(path) => path,
		None => {
			eprintln!("usage: dump <path> [--default-namespace]");
			process::exit(2);
		}
	};
	let mut opts = TokenizerOptions::defaults();
	if args.any(|arg| arg == "--default-namespace") {
		opts.default_namespace(true);
	}

	let mut nerrors = 0usize;
	let status = {
		let mut sink = FnSink(|ev| {
			match ev {
				Event::Error(diag) => {
					nerrors += 1;
					eprintln!("{}: {}", path, diag);
				}
				other => println!("{:?}", other),
			}
			Control::Continue
		});
		xmltok::parse_path(&Tokenizer::with_options(opts), &path, &mut sink)
	};

	match status {
		ParseStatus::Complete if nerrors == 0 => (),
		ParseStatus::Complete | ParseStatus::Stopped => process::exit(1),
		ParseStatus::Truncated | ParseStatus::Failed => process::exit(3),
	}
}
