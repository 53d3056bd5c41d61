//! Dice terms (`NdM`), their expected values, and the errors that come out of rolling them.
//!
//! Rolling itself lives in [`roller`], which turns random bytes into unbiased die results.

pub mod roller;

use core::{fmt, num::NonZeroU32};

pub use self::roller::Roller;

/// A group of identical dice: `count` independent dice, each uniformly distributed over `1..=sides`.
///
/// The [`Display`](fmt::Display) output is the canonical `NdM` form, even when the source text used a bare `dM`.
///
/// # Examples
/// ```
/// use dicebag::Dice;
///
/// let dice: Dice = "d20".parse()?;
/// assert_eq!(dice, Dice::new(1, 20).unwrap());
/// assert_eq!(dice.to_string(), "1d20");
/// # Ok::<(), dicebag::parse::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "A dice term is only ever a count and a side count")]
pub struct Dice {
	/// Number of dice to roll
	pub count: NonZeroU32,

	/// Number of sides for each die
	pub sides: NonZeroU32,
}

impl Dice {
	/// Creates a new set of dice with a given count and number of sides.
	/// Returns [`None`] if either of them is zero.
	#[must_use]
	pub const fn new(count: u32, sides: u32) -> Option<Self> {
		match (NonZeroU32::new(count), NonZeroU32::new(sides)) {
			(Some(count), Some(sides)) => Some(Self { count, sides }),
			_ => None,
		}
	}

	/// Calculates the expected total of the dice, rounded up: `ceil(count * (sides + 1) / 2)`.
	///
	/// # Examples
	/// ```
	/// use dicebag::Dice;
	///
	/// assert_eq!(Dice::new(2, 6).unwrap().average(), 7);
	/// assert_eq!(Dice::new(1, 20).unwrap().average(), 11);
	/// assert_eq!(Dice::new(3, 8).unwrap().average(), 14);
	/// assert_eq!(Dice::new(5, 1).unwrap().average(), 5);
	/// ```
	#[must_use]
	#[expect(
		clippy::arithmetic_side_effects,
		reason = "u32::MAX * (u32::MAX + 1) still fits in a u64"
	)]
	pub fn average(&self) -> u64 {
		let doubled = u64::from(self.count.get()) * (u64::from(self.sides.get()) + 1);
		doubled.div_ceil(2)
	}

	/// Smallest total the dice can roll.
	#[must_use]
	pub fn min(&self) -> u64 {
		u64::from(self.count.get())
	}

	/// Largest total the dice can roll.
	#[must_use]
	#[expect(clippy::arithmetic_side_effects, reason = "u32 * u32 fits in a u64")]
	pub fn max(&self) -> u64 {
		u64::from(self.count.get()) * u64::from(self.sides.get())
	}

	/// Rolls the dice with a given roller and returns the sum of every die.
	///
	/// # Errors
	/// If the roller can't produce a value for a die, an error variant is returned.
	#[inline]
	pub fn roll(&self, roller: &mut impl Roller) -> Result<u64, Error> {
		roller.roll(self)
	}
}

impl fmt::Display for Dice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}d{}", self.count, self.sides)
	}
}

/// An error resulting from drawing random values
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The operating system's random source failed to provide bytes.
	#[error("random source failure: {0}")]
	Entropy(#[from] rand::Error),

	/// The requested range has no values in it.
	///
	/// # Examples
	/// ```
	/// use dicebag::dice::{roller::{Iter as IterRoller, Roller}, Error};
	///
	/// let result = IterRoller::new([0]).sample(6, 1);
	/// assert!(matches!(result, Err(Error::EmptyRange { min: 6, max: 1 })));
	/// ```
	#[error("empty range {min}..={max}")]
	EmptyRange {
		/// Requested lower bound
		min: u32,
		/// Requested upper bound
		max: u32,
	},

	/// The requested range holds more values than a single random byte can select between.
	///
	/// # Examples
	/// ```
	/// use dicebag::dice::{roller::{Iter as IterRoller, Roller}, Error};
	///
	/// let result = IterRoller::new([0]).sample(1, 1000);
	/// assert!(matches!(result, Err(Error::RangeTooLarge(1000))));
	/// ```
	#[error("range of {0} values is too large to sample (at most 256)")]
	RangeTooLarge(u64),

	/// A finite roller ran out of values.
	#[error("roller has no more values")]
	Exhausted,

	/// The sum of the rolls didn't fit in the total's type.
	#[error("integer overflow while totalling {0}")]
	Overflow(Dice),
}
