use crate::dice::{
	roller::{Iter as IterRoller, Os as OsRoller, Roller},
	Dice, Error,
};

#[cfg(feature = "fastrand")]
use crate::dice::roller::FastRand as FastRandRoller;

#[test]
fn sample_maps_bytes_onto_range() {
	let mut roller = IterRoller::new([0, 1, 5, 6, 251]);
	let samples = (0..5).map(|_| roller.sample(1, 6).unwrap()).collect::<Vec<_>>();
	assert_eq!(samples, [1, 2, 6, 1, 6]);
	assert!(matches!(roller.next_byte(), Err(Error::Exhausted)));
}

#[test]
fn sample_rejects_biased_bytes() {
	// 256 / 6 = 42 full blocks, so 252..=255 would favour 1..=4 and must be redrawn
	let mut roller = IterRoller::new([252, 253, 254, 255, 2]);
	assert_eq!(roller.sample(1, 6).unwrap(), 3);
	assert!(matches!(roller.next_byte(), Err(Error::Exhausted)));
}

#[test]
fn sample_keeps_bytes_below_limit() {
	let mut roller = IterRoller::new([251]);
	assert_eq!(roller.sample(1, 6).unwrap(), 6);
}

#[test]
fn sample_full_byte_range_never_rejects() {
	let mut roller = IterRoller::new([255, 0]);
	assert_eq!(roller.sample(0, 255).unwrap(), 255);
	assert_eq!(roller.sample(1, 256).unwrap(), 1);
}

#[test]
fn sample_single_value() {
	let mut roller = IterRoller::new([0, 128, 255]);
	for _ in 0..3 {
		assert_eq!(roller.sample(7, 7).unwrap(), 7);
	}
}

#[test]
fn sample_offset_range() {
	let mut roller = IterRoller::new([9]);
	assert_eq!(roller.sample(10, 19).unwrap(), 19);
}

#[test]
fn sample_empty_range() {
	let result = IterRoller::new([0]).sample(6, 1);
	assert!(matches!(result, Err(Error::EmptyRange { min: 6, max: 1 })));
}

#[test]
fn sample_range_too_large() {
	let result = IterRoller::new([0]).sample(1, 257);
	assert!(matches!(result, Err(Error::RangeTooLarge(257))));

	let result = IterRoller::new([0]).sample(0, u32::MAX);
	assert!(matches!(result, Err(Error::RangeTooLarge(..))));
}

#[test]
fn sample_exhausted() {
	let result = IterRoller::new([252, 253]).sample(1, 6);
	assert!(matches!(result, Err(Error::Exhausted)));
}

#[test]
fn os_samples_in_range() {
	let mut roller = OsRoller;
	for sides in [1, 2, 3, 4, 6, 8, 10, 12, 20, 100, 256] {
		for _ in 0..100 {
			let val = roller.sample(1, sides).unwrap();
			assert!((1..=sides).contains(&val));
		}
	}
}

#[test]
fn os_faces_are_uniform() {
	const TRIALS: usize = 60_000;

	let mut roller = OsRoller;
	let mut counts = [0_usize; 6];
	for _ in 0..TRIALS {
		let val = roller.sample(1, 6).unwrap();
		counts[val as usize - 1] += 1;
	}

	// Expected 10 000 per face with a standard deviation of ~91, so 600 is well over 6 sigma
	for (face, &count) in counts.iter().enumerate() {
		assert!(count.abs_diff(TRIALS / 6) < 600, "face {} came up {count} times", face + 1);
	}
}

#[test]
fn os_all_dice_sides_occur() {
	let dice = Dice::new(255, 20).unwrap();
	let mut seen = [false; 20];
	let mut roller = OsRoller;

	for _ in 0..100 {
		for _ in 0..dice.count.get() {
			let val = roller.sample(1, dice.sides.get()).unwrap();
			seen[val as usize - 1] = true;
		}
	}

	assert!(seen.iter().all(|&side| side));
}

#[test]
fn os_roll_in_range() {
	let mut roller = OsRoller;
	for (count, sides) in [(1, 20), (2, 8), (100, 42), (255, 255)] {
		let dice = Dice::new(count, sides).unwrap();
		let total = roller.roll(&dice).unwrap();
		assert!((dice.min()..=dice.max()).contains(&total), "{dice} rolled {total}");
	}
}

#[test]
fn os_d6_mean_converges() {
	const TRIALS: u32 = 10_000;

	let dice = Dice::new(1, 6).unwrap();
	let mut roller = OsRoller;
	let sum: u64 = (0..TRIALS).map(|_| roller.roll(&dice).unwrap()).sum();
	let mean = sum as f64 / f64::from(TRIALS);

	// Standard error of the mean is ~0.017
	assert!((mean - 3.5).abs() < 0.1, "mean was {mean}");
}

#[cfg(feature = "fastrand")]
#[test]
fn fastrand_seeded_is_reproducible() {
	let dice = Dice::new(10, 20).unwrap();
	let mut first = FastRandRoller::with_seed(0x750c38d574400);
	let mut second = FastRandRoller::with_seed(0x750c38d574400);

	for _ in 0..50 {
		assert_eq!(first.roll(&dice).unwrap(), second.roll(&dice).unwrap());
	}
}

#[cfg(feature = "fastrand")]
#[test]
fn fastrand_samples_in_range() {
	let mut roller = FastRandRoller::default();
	for _ in 0..1000 {
		let val = roller.sample(1, 12).unwrap();
		assert!((1..=12).contains(&val));
	}
}
