//! Abstractions for turning random bytes into unbiased die results using various byte sources.

#[cfg(feature = "fastrand")]
use fastrand::Rng;
use rand::{rngs::OsRng, RngCore};

use super::{Dice, Error};

/// Number of distinct values a single random byte can take.
const BYTE_DOMAIN: u64 = 256;

/// Rolls dice - what else is there to say?
///
/// Implementors only provide single random bytes. Mapping those onto a die's range is done by
/// [`Roller::sample()`] with rejection sampling, so every face of a die is equally likely no matter
/// which byte source is in use.
pub trait Roller {
	/// Produces a single random byte.
	///
	/// # Errors
	/// If the underlying source can't produce a byte, an error variant is returned.
	fn next_byte(&mut self) -> Result<u8, Error>;

	/// Draws an integer uniformly distributed over `min..=max`.
	///
	/// Bytes at or above the largest multiple of the range that fits in a byte are discarded and redrawn, which
	/// removes the bias a plain `byte % range` would have whenever the range doesn't evenly divide 256.
	///
	/// # Errors
	/// If `max` is less than `min`, the range holds more than 256 values, or the byte source fails, an error variant
	/// is returned.
	///
	/// # Examples
	/// ```
	/// use dicebag::dice::roller::{Iter as IterRoller, Roller};
	///
	/// // 252 and 255 are past the last full block of six values (0..252), so both get rejected
	/// let mut roller = IterRoller::new([252, 255, 3]);
	/// assert_eq!(roller.sample(1, 6)?, 4);
	/// # Ok::<(), dicebag::dice::Error>(())
	/// ```
	#[expect(clippy::arithmetic_side_effects, reason = "range is always within 1..=256 here")]
	fn sample(&mut self, min: u32, max: u32) -> Result<u32, Error> {
		let span = max.checked_sub(min).ok_or(Error::EmptyRange { min, max })?;
		let range = u64::from(span).saturating_add(1);
		if range > BYTE_DOMAIN {
			return Err(Error::RangeTooLarge(range));
		}

		let limit = BYTE_DOMAIN / range * range;
		loop {
			let byte = u64::from(self.next_byte()?);
			if byte < limit {
				let offset = u32::try_from(byte % range).map_err(|_err| Error::RangeTooLarge(range))?;
				return min.checked_add(offset).ok_or(Error::RangeTooLarge(range));
			}
		}
	}

	/// Rolls a set of dice and sums every die.
	///
	/// Every die takes at least one [`Self::next_byte()`] call, so the cost grows linearly with the dice count. With
	/// [`Os`] that is one system call per byte, which makes counts in the millions or more impractically slow.
	///
	/// # Errors
	/// If any die can't be sampled or the sum overflows, an error variant is returned.
	fn roll(&mut self, dice: &Dice) -> Result<u64, Error>
	where
		Self: Sized,
	{
		let mut sum: u64 = 0;
		for _ in 0..dice.count.get() {
			let val = self.sample(1, dice.sides.get())?;
			sum = sum.checked_add(u64::from(val)).ok_or(Error::Overflow(*dice))?;
		}
		Ok(sum)
	}
}

/// Generates rolls from the operating system's cryptographically secure random source, one byte per draw.
///
/// This holds no state, so it can be created wherever it's needed and is safe to use from any thread. Each byte is a
/// separate read from the OS, so rolling very large dice counts is slow; use `FastRand` when that matters more than
/// cryptographic strength.
///
/// # Examples
/// ```
/// use dicebag::dice::{roller::{Os as OsRoller, Roller}, Dice};
///
/// let dice = Dice::new(4, 6).unwrap();
/// let total = OsRoller.roll(&dice)?;
/// assert!((4..=24).contains(&total));
/// # Ok::<(), dicebag::dice::Error>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
#[expect(clippy::exhaustive_structs, reason = "Stateless marker")]
pub struct Os;

impl Roller for Os {
	/// Reads a single byte from [`OsRng`].
	fn next_byte(&mut self) -> Result<u8, Error> {
		let mut buf = [0_u8; 1];
		OsRng.try_fill_bytes(&mut buf)?;
		Ok(buf[0])
	}
}

/// Generates rolls with [fastrand]. Not cryptographically secure, but it can be seeded for reproducible results.
/// Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Manually seeded fastrand roller
/// ```
/// use dicebag::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
///
/// let dice = Dice::new(4, 6).unwrap();
/// let first = FastRandRoller::with_seed(0x750c38d574400).roll(&dice)?;
/// let second = FastRandRoller::with_seed(0x750c38d574400).roll(&dice)?;
/// assert_eq!(first, second);
/// # Ok::<(), dicebag::dice::Error>(())
/// ```
///
/// ## Custom fastrand roller
/// ```
/// use dicebag::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
/// use fastrand::Rng;
///
/// let mut roller = FastRandRoller::new(Rng::with_seed(42));
/// let _ = roller.roll(&Dice::new(2, 20).unwrap())?;
/// # Ok::<(), dicebag::dice::Error>(())
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone, Default)]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate bytes.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate bytes.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	#[inline]
	fn next_byte(&mut self) -> Result<u8, Error> {
		Ok(self.0.u8(..))
	}
}

/// Generates bytes from an iterator of values. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use dicebag::dice::{roller::{Iter as IterRoller, Roller}, Dice, Error};
///
/// let mut roller = IterRoller::new(vec![0, 1, 2]);
/// assert_eq!(roller.roll(&Dice::new(3, 6).unwrap())?, 6);
/// assert!(matches!(roller.sample(1, 6), Err(Error::Exhausted)));
/// # Ok::<(), dicebag::dice::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u8>>(I);

impl<I: Iterator<Item = u8>> Iter<I> {
	/// Creates a new roller that uses the given iterator to provide byte values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter())
	}
}

impl<I: Iterator<Item = u8>> Roller for Iter<I> {
	/// Takes the next value from the iterator.
	#[inline]
	fn next_byte(&mut self) -> Result<u8, Error> {
		self.0.next().ok_or(Error::Exhausted)
	}
}
