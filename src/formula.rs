//! Dice formulas (`NdM` terms summed with `+K` constants) and their evaluation, either as an expected value or as a
//! simulated roll.

use core::fmt;

use crate::{
	dice::{roller::Os as OsRoller, Dice, Error as DiceError, Roller},
	parse,
};

/// How a formula gets evaluated.
///
/// The mode also decides how dice terms are extracted: [`Mode::Average`] accepts a bare `dM` as `1dM`, while
/// [`Mode::Simulate`] only accepts terms with an explicit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Mode {
	/// Expected value, rounded up per dice term
	#[default]
	Average,

	/// One random draw per die
	Simulate,
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Average => "average",
			Self::Simulate => "simulate",
		})
	}
}

/// Dice terms and constants extracted from a formula string. There is always at least one dice term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
	/// Dice terms, in order of appearance
	dice: Vec<Dice>,

	/// Constants to add to the total, in order of appearance
	constants: Vec<i64>,
}

impl Formula {
	/// Creates a formula from its terms. Returns [`None`] if there are no dice terms.
	#[must_use]
	pub fn new(dice: Vec<Dice>, constants: Vec<i64>) -> Option<Self> {
		(!dice.is_empty()).then_some(Self { dice, constants })
	}

	/// Extracts a formula from a string. See [`parse::formula()`].
	///
	/// # Errors
	/// If no dice terms are found, or if any term is malformed, an error variant is returned.
	#[inline]
	pub fn parse(text: &str, mode: Mode) -> Result<Self, parse::Error> {
		parse::formula(text, mode)
	}

	/// Dice terms of the formula
	#[must_use]
	pub fn dice(&self) -> &[Dice] {
		&self.dice
	}

	/// Constants of the formula
	#[must_use]
	pub fn constants(&self) -> &[i64] {
		&self.constants
	}

	/// Sums all of the formula's constants.
	///
	/// # Errors
	/// If the sum overflows, an error variant is returned.
	pub fn constant_total(&self) -> Result<i64, Error> {
		self.constants
			.iter()
			.try_fold(0_i64, |sum, &val| sum.checked_add(val))
			.ok_or(Error::Overflow)
	}

	/// Calculates the expected total of the formula: every dice term's average, each rounded up on its own, plus every
	/// constant.
	///
	/// # Errors
	/// If the total overflows, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicebag::formula::{Formula, Mode};
	///
	/// let formula = Formula::parse("d4+d6+2", Mode::Average)?;
	/// assert_eq!(formula.average()?, 9);
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn average(&self) -> Result<i64, Error> {
		let mut sum = self.constant_total()?;
		for dice in &self.dice {
			let avg = i64::try_from(dice.average()).map_err(|_err| Error::Overflow)?;
			sum = sum.checked_add(avg).ok_or(Error::Overflow)?;
		}
		Ok(sum)
	}

	/// Rolls every die in the formula with the given roller and adds every constant.
	///
	/// Each die is drawn separately (see [`Roller::roll()`]), so the time taken grows with the total dice count. A
	/// formula like `4294967295d6` is valid but will take billions of draws.
	///
	/// # Errors
	/// If the roller fails for any dice term, or the total overflows, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicebag::{dice::roller::Iter as IterRoller, formula::{Formula, Mode}};
	///
	/// let formula = Formula::parse("2d6+3", Mode::Simulate)?;
	/// let mut roller = IterRoller::new([5, 0]);
	/// assert_eq!(formula.simulate(&mut roller)?, 6 + 1 + 3);
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn simulate(&self, roller: &mut impl Roller) -> Result<i64, Error> {
		let mut sum = self.constant_total()?;
		for dice in &self.dice {
			let rolled = dice.roll(roller).map_err(|err| Error::Roll(*dice, err))?;
			tracing::trace!(%dice, rolled, min = dice.min(), max = dice.max(), "rolled dice");
			let rolled = i64::try_from(rolled).map_err(|_err| Error::Overflow)?;
			sum = sum.checked_add(rolled).ok_or(Error::Overflow)?;
		}
		Ok(sum)
	}

	/// Evaluates the formula in the given mode. [`Mode::Simulate`] uses the given roller, [`Mode::Average`] ignores it.
	///
	/// # Errors
	/// See [`Self::average()`] and [`Self::simulate()`].
	pub fn eval(&self, mode: Mode, roller: &mut impl Roller) -> Result<i64, Error> {
		match mode {
			Mode::Average => self.average(),
			Mode::Simulate => self.simulate(roller),
		}
	}
}

impl fmt::Display for Formula {
	/// Formats the formula back into `NdM+K` notation, dice first and constants after.
	///
	/// # Examples
	/// ```
	/// use dicebag::formula::{Formula, Mode};
	///
	/// let formula = Formula::parse("D4+x+d6+2", Mode::Average)?;
	/// assert_eq!(formula.to_string(), "1d4+1d6+2");
	/// # Ok::<(), dicebag::parse::Error>(())
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let terms = self
			.dice
			.iter()
			.map(ToString::to_string)
			.chain(self.constants.iter().map(ToString::to_string))
			.collect::<Vec<_>>();
		f.write_str(&terms.join("+"))
	}
}

/// Error that can occur while extracting or evaluating a formula
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The formula couldn't be extracted from its text.
	#[error(transparent)]
	Parse(#[from] parse::Error),

	/// Rolling a dice term failed.
	#[error("error while rolling {0}: {1}")]
	Roll(Dice, #[source] DiceError),

	/// The total didn't fit in an `i64`.
	#[error("integer overflow while totalling formula")]
	Overflow,
}

/// Extracts a formula and calculates its expected total.
///
/// # Errors
/// If the formula has no dice, has a malformed term, or its total overflows, an error variant is returned.
///
/// # Examples
/// ```
/// assert_eq!(dicebag::average("2d6+3")?, 10);
/// assert_eq!(dicebag::average("1d20")?, 11);
/// assert_eq!(dicebag::average("3d8+5+2")?, 21);
/// # Ok::<(), dicebag::formula::Error>(())
/// ```
pub fn average(text: &str) -> Result<i64, Error> {
	Ok(Formula::parse(text, Mode::Average)?.average()?)
}

/// Extracts a formula and rolls it using the operating system's secure random source.
///
/// # Errors
/// If the formula has no dice (note that a bare `dM` doesn't count here), has a malformed term, the random source
/// fails, or the total overflows, an error variant is returned.
///
/// # Examples
/// ```
/// let total = dicebag::simulate("2d6+3")?;
/// assert!((5..=15).contains(&total));
///
/// assert!(dicebag::simulate("d6").is_err());
/// # Ok::<(), dicebag::formula::Error>(())
/// ```
pub fn simulate(text: &str) -> Result<i64, Error> {
	Formula::parse(text, Mode::Simulate)?.simulate(&mut OsRoller)
}
