//! Extraction of dice terms and constants from formula strings.
//!
//! A formula is not parsed as a single expression tree. Dice terms and constants are found by two independent scans
//! over the same text, and anything that matches neither scan is ignored. Each dice term found is then run through
//! the dice grammar from [`dice()`] to turn it into [`Dice`].

use core::ops::Range;
use std::sync::LazyLock;

use chumsky::prelude::*;
use regex::Regex;

use crate::{
	dice::Dice,
	formula::{Formula, Mode},
};

/// Dice terms with an optional count (`d6`, `2d6`)
static DICE_OPTIONAL_COUNT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)[0-9]*d[0-9]+"));

/// Dice terms with a required count (`2d6`, but not `d6`)
static DICE_REQUIRED_COUNT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)[0-9]+d[0-9]+"));

/// Digit runs directly after a `+`. Whether they end in another `+` or the end of the formula is checked separately.
static CONSTANT: LazyLock<Regex> = LazyLock::new(|| compile(r"\+([0-9]+)"));

/// Compiles one of the module's fixed patterns.
#[expect(clippy::expect_used, reason = "Patterns are constant and covered by tests")]
pub(crate) fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).expect("invalid built-in pattern")
}

/// Generates a parser that specifically handles dice terms like "d20", "2d6", etc.
/// Digit runs may have leading zeros (`02d06` is `2d6`); a zero count or side count is rejected.
pub fn dice_part<'src>() -> impl Parser<'src, &'src str, Dice, extra::Err<Rich<'src, char>>> + Clone {
	let digits = text::digits(10).collect::<String>();

	digits
		.clone()
		.or_not()
		.then_ignore(just('d'))
		.then(digits)
		.try_map(|(count, sides): (Option<String>, String), span| {
			let count = count
				.as_deref()
				.unwrap_or("1")
				.parse()
				.map_err(|err| Rich::custom(span, format!("dice count: {err}")))?;
			let sides = sides
				.parse()
				.map_err(|err| Rich::custom(span, format!("dice sides: {err}")))?;

			Ok(Dice { count, sides })
		})
}

/// Generates a parser that specifically handles dice terms like "d20", "2d6", etc. and expects end of input
pub fn dice<'src>() -> impl Parser<'src, &'src str, Dice, extra::Err<Rich<'src, char>>> + Clone {
	dice_part().then_ignore(end())
}

/// Runs the dice grammar over a single term, joining any errors into one message.
fn parse_term(term: &str) -> Result<Dice, String> {
	let lc = term.to_ascii_lowercase();
	let result = dice()
		.parse(&lc)
		.into_result()
		.map_err(|errs| errs.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "));
	result
}

/// Extracts every dice term from a formula, in order of appearance.
/// The `mode` decides whether a bare `dM` (no count) counts as a die.
///
/// # Errors
/// If a matched term doesn't hold a valid count and side count (zero or too large), an error variant is
/// returned.
///
/// # Examples
/// ```
/// use dicebag::{formula::Mode, parse, Dice};
///
/// let dice = parse::dice_terms("d4+2d6+1", Mode::Average)?;
/// assert_eq!(dice, vec![Dice::new(1, 4).unwrap(), Dice::new(2, 6).unwrap()]);
///
/// let dice = parse::dice_terms("d4+2d6+1", Mode::Simulate)?;
/// assert_eq!(dice, vec![Dice::new(2, 6).unwrap()]);
/// # Ok::<(), dicebag::parse::Error>(())
/// ```
pub fn dice_terms(formula: &str, mode: Mode) -> Result<Vec<Dice>, Error> {
	let pattern = match mode {
		Mode::Average => &*DICE_OPTIONAL_COUNT,
		Mode::Simulate => &*DICE_REQUIRED_COUNT,
	};

	pattern
		.find_iter(formula)
		.map(|found| {
			parse_term(found.as_str()).map_err(|details| Error::MalformedTerm {
				term: found.as_str().to_owned(),
				span: found.range(),
				details,
			})
		})
		.collect()
}

/// Extracts every constant from a formula, in order of appearance.
/// A constant is a run of digits with a `+` right before it and either another `+` or the end of the formula right
/// after it. Anything else is not a constant, so `1d6+2` has the constant 2 but `1d6+2x` and `1d6+1d4` have none.
///
/// # Errors
/// If a constant is too large for an `i64`, an error variant is returned.
///
/// # Examples
/// ```
/// use dicebag::parse;
///
/// assert_eq!(parse::constants("3d8+5+2")?, vec![5, 2]);
/// assert_eq!(parse::constants("1d4+1d6+2")?, vec![2]);
/// assert!(parse::constants("2d6+3 ")?.is_empty());
/// # Ok::<(), dicebag::parse::Error>(())
/// ```
pub fn constants(formula: &str) -> Result<Vec<i64>, Error> {
	CONSTANT
		.captures_iter(formula)
		.filter_map(|caps| {
			let digits = caps.get(1)?;
			let delimited = formula
				.get(digits.end()..)
				.is_some_and(|rest| rest.is_empty() || rest.starts_with('+'));
			delimited.then_some(digits)
		})
		.map(|digits| {
			digits.as_str().parse().map_err(|err| Error::MalformedTerm {
				term: digits.as_str().to_owned(),
				span: digits.range(),
				details: format!("constant: {err}"),
			})
		})
		.collect()
}

/// Extracts a full [`Formula`] (all dice terms and all constants) from a formula string.
///
/// # Errors
/// If no dice terms are found, or if any term is malformed, an error variant is returned.
///
/// # Examples
/// ```
/// use dicebag::{formula::Mode, parse};
///
/// let formula = parse::formula("2d6+3", Mode::Average)?;
/// assert_eq!(formula.dice().len(), 1);
/// assert_eq!(formula.constants(), &[3]);
///
/// assert!(matches!(parse::formula("d6", Mode::Simulate), Err(parse::Error::NoDice { .. })));
/// # Ok::<(), dicebag::parse::Error>(())
/// ```
pub fn formula(text: &str, mode: Mode) -> Result<Formula, Error> {
	let dice = dice_terms(text, mode)?;
	tracing::debug!(formula = text, ?mode, count = dice.len(), "found dice terms");

	let constants = constants(text)?;
	if !constants.is_empty() {
		tracing::debug!(formula = text, count = constants.len(), "found constants");
	}

	Formula::new(dice, constants).ok_or_else(|| Error::NoDice {
		formula: text.to_owned(),
	})
}

/// An error resulting from extracting terms from a formula
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// Nothing in the formula looked like a dice term.
	#[error("no dice found in \"{formula}\"")]
	NoDice {
		/// Formula that was searched
		formula: String,
	},

	/// Something in the formula looked like a term but didn't hold a usable number.
	///
	/// # Examples
	/// ```
	/// use dicebag::{formula::Mode, parse};
	///
	/// let err = parse::formula("1d0+2", Mode::Average).unwrap_err();
	/// assert!(matches!(err, parse::Error::MalformedTerm { ref term, ref span, .. } if term == "1d0" && *span == (0..3)));
	/// ```
	#[error("malformed term \"{term}\": {details}")]
	MalformedTerm {
		/// Text of the offending term
		term: String,
		/// Byte range of the term within the formula
		span: Range<usize>,
		/// What was wrong with it
		details: String,
	},
}

impl core::str::FromStr for Dice {
	type Err = Error;

	/// Parses a single dice term like "2d6" or "D20". The whole string must be the term.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_term(s).map_err(|details| Error::MalformedTerm {
			term: s.to_owned(),
			span: 0..s.len(),
			details,
		})
	}
}
