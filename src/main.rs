use std::{
	env,
	io::{self, IsTerminal, Read, Write},
	process::ExitCode,
};

use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use dicebag::{
	dice::roller::{FastRand as FastRandRoller, Os as OsRoller, Roller},
	formula::Error as FormulaError,
	parse::Error as ParseError,
	scan::{self, Outcome},
	Mode,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Which evaluation modes to run
#[derive(Debug, Clone, Copy)]
struct Settings {
	average: bool,
	simulate: bool,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			average: true,
			simulate: false,
		}
	}
}

/// Everything gathered from the command line
#[derive(Debug, Default)]
struct Args {
	settings: Settings,
	seed: Option<u64>,
	text: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
	let mut parsed = Args::default();
	let mut explicit = Settings {
		average: false,
		simulate: false,
	};

	while let Some(arg) = args.next() {
		match arg.as_str() {
			"-a" | "--average" => explicit.average = true,
			"-s" | "--simulate" => explicit.simulate = true,
			"--seed" => {
				let seed = args.next().ok_or("--seed needs a value")?;
				parsed.seed = Some(seed.parse().map_err(|err| format!("invalid seed \"{seed}\": {err}"))?);
			}
			"--" => {
				parsed.text.extend(args.by_ref());
			}
			_ => parsed.text.push(arg),
		}
	}

	if explicit.average || explicit.simulate {
		parsed.settings = explicit;
	}
	Ok(parsed)
}

fn init_logger() {
	let filter = EnvFilter::try_from_env("DICEBAG_LOG").unwrap_or_else(|_| EnvFilter::new("dicebag=warn"));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(io::stderr)
				.with_target(false)
				.compact(),
		)
		.init();
}

fn read_input(text: Vec<String>) -> io::Result<String> {
	// Obtain the text by combining all args passed to the executable, so that it can be left unquoted even with spaces
	if !text.is_empty() {
		return Ok(text.join(" "));
	}

	let mut stdin = io::stdin();
	if stdin.is_terminal() {
		print!("Enter text containing dice: ");
		io::stdout().flush()?;
		let mut line = String::new();
		stdin.read_line(&mut line)?;
		return Ok(line);
	}

	let mut input = String::new();
	stdin.read_to_string(&mut input)?;
	Ok(input)
}

/// Prints a failed formula to stderr, pointing at the offending term when there is one.
fn report_failure(formula: &str, err: &FormulaError) {
	if let FormulaError::Parse(ParseError::MalformedTerm { span, details, .. }) = err {
		let report = Report::build(ReportKind::Error, (formula, span.clone()))
			.with_config(Config::default().with_index_type(IndexType::Byte))
			.with_message(err.to_string())
			.with_label(Label::new((formula, span.clone())).with_message(details))
			.finish()
			.eprint((formula, Source::from(formula)));
		if report.is_ok() {
			return;
		}
	}

	eprintln!("Could not evaluate {formula}: {err}");
}

fn run(text: &str, mode: Mode, roller: &mut impl Roller) -> Result<bool, scan::Error> {
	let outcomes = scan::evaluate(text, mode, roller)?;
	let label = match mode {
		Mode::Simulate => "Simulated",
		_ => "Average of",
	};

	let mut all_ok = true;
	for Outcome { formula, result, .. } in &outcomes {
		match result {
			Ok(total) => println!("{label} {formula}: {total}"),
			Err(err) => {
				all_ok = false;
				report_failure(formula, err);
			}
		}
	}
	Ok(all_ok)
}

fn main() -> ExitCode {
	init_logger();

	let args = match parse_args(env::args().skip(1)) {
		Ok(args) => args,
		Err(err) => {
			eprintln!("{err}");
			eprintln!("Usage: dicebag [-a|--average] [-s|--simulate] [--seed N] [TEXT...]");
			return ExitCode::FAILURE;
		}
	};

	let input = match read_input(args.text) {
		Ok(input) => input,
		Err(err) => {
			eprintln!("Failed to read input: {err}");
			return ExitCode::FAILURE;
		}
	};

	let mut modes = Vec::new();
	if args.settings.average {
		modes.push(Mode::Average);
	}
	if args.settings.simulate {
		modes.push(Mode::Simulate);
	}

	let mut all_ok = true;
	for mode in modes {
		let result = match args.seed {
			Some(seed) => run(&input, mode, &mut FastRandRoller::with_seed(seed)),
			None => run(&input, mode, &mut OsRoller),
		};

		match result {
			Ok(ok) => all_ok &= ok,
			Err(scan::Error::NoFormulaFound) => {
				eprintln!("No dice found");
				return ExitCode::FAILURE;
			}
			Err(err) => {
				eprintln!("{err}");
				return ExitCode::FAILURE;
			}
		}
	}

	if all_ok {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}
