//! Discovery of dice formulas inside free-form text, and evaluation of every formula found.

use core::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::{
	dice::Roller,
	formula::{Error as FormulaError, Formula, Mode},
	parse::compile,
};

/// Anything starting with a dice term, up to the next space, line break, or the end of the text
static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)[0-9]*d[0-9]+[^ \r\n]*"));

/// A piece of text that looks like it holds a dice formula
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Candidate<'a> {
	/// Text of the formula
	pub formula: &'a str,

	/// Byte range of the formula within the scanned text
	pub span: Range<usize>,
}

/// Result of evaluating a single [`Candidate`]
#[derive(Debug)]
#[non_exhaustive]
pub struct Outcome<'a> {
	/// Text of the formula
	pub formula: &'a str,

	/// Byte range of the formula within the scanned text
	pub span: Range<usize>,

	/// Total of the formula, or why it couldn't be evaluated
	pub result: Result<i64, FormulaError>,
}

/// Finds every candidate formula in a text, in order of appearance.
///
/// This deliberately matches more than the formula extraction in [`parse`](crate::parse) accepts: a candidate runs from
/// the first dice term to the next whitespace, so `2d6+3,` or `d6` in simulate mode can still fail later.
///
/// # Examples
/// ```
/// use dicebag::scan;
///
/// let found = scan::find("Hits for 2d6+3 slashing, or d8 when\nwielded with two hands");
/// let formulas = found.iter().map(|candidate| candidate.formula).collect::<Vec<_>>();
/// assert_eq!(formulas, ["2d6+3", "d8"]);
/// assert_eq!(found[0].span, 9..14);
/// ```
#[must_use]
pub fn find(text: &str) -> Vec<Candidate<'_>> {
	CANDIDATE
		.find_iter(text)
		.map(|found| Candidate {
			formula: found.as_str(),
			span: found.range(),
		})
		.collect()
}

/// Finds every formula in a text and evaluates each one independently in the given mode.
/// A formula that fails doesn't stop the others from being evaluated; its error ends up in its [`Outcome`].
///
/// # Errors
/// If the text contains no candidate formulas at all, [`Error::NoFormulaFound`] is returned.
///
/// # Examples
/// ```
/// use dicebag::{dice::roller::Os as OsRoller, formula::Mode, scan};
///
/// let outcomes = scan::evaluate("Deals 2d6+3 damage, or 1d0 on a miss", Mode::Average, &mut OsRoller)?;
/// assert_eq!(outcomes.len(), 2);
/// assert_eq!(outcomes[0].result.as_ref().ok(), Some(&10));
/// assert!(outcomes[1].result.is_err());
///
/// assert!(scan::evaluate("no dice here", Mode::Average, &mut OsRoller).is_err());
/// # Ok::<(), dicebag::scan::Error>(())
/// ```
pub fn evaluate<'a>(text: &'a str, mode: Mode, roller: &mut impl Roller) -> Result<Vec<Outcome<'a>>, Error> {
	let candidates = find(text);
	if candidates.is_empty() {
		return Err(Error::NoFormulaFound);
	}
	tracing::info!(count = candidates.len(), %mode, "evaluating formulas");

	Ok(candidates
		.into_iter()
		.map(|Candidate { formula, span }| {
			let result = Formula::parse(formula, mode)
				.map_err(FormulaError::from)
				.and_then(|parsed| parsed.eval(mode, &mut *roller));

			match &result {
				Ok(total) => tracing::debug!(formula, total, "evaluated formula"),
				Err(err) => tracing::debug!(formula, error = %err, "failed to evaluate formula"),
			}

			Outcome { formula, span, result }
		})
		.collect())
}

/// Error that can occur while scanning text for formulas
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// Nothing in the text looked like a dice formula.
	#[error("no dice found")]
	NoFormulaFound,
}
