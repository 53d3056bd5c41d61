#![feature(test)]

extern crate test;

use chumsky::Parser;
use dicebag::{parse, Dice, Formula, Mode};
use test::Bencher;

const LONG_FORMULA: &str = "1d4+2d6+3d8+4d10+5d12+6d20+7d100+1+2+3+4+5+6+7+8+9+10";

#[bench]
fn grammar_basic(b: &mut Bencher) {
	let parser = parse::dice();
	b.iter(|| parser.parse("4d8").into_result().unwrap());
}

#[bench]
fn grammar_creation(b: &mut Bencher) {
	b.iter(parse::dice);
}

#[bench]
fn fromstr_basic(b: &mut Bencher) {
	b.iter(|| "4d8".parse::<Dice>().unwrap());
}

#[bench]
fn formula_basic(b: &mut Bencher) {
	b.iter(|| Formula::parse("4d8+4", Mode::Average).unwrap());
}

#[bench]
fn formula_long(b: &mut Bencher) {
	b.iter(|| Formula::parse(LONG_FORMULA, Mode::Average).unwrap());
}

#[bench]
fn constants_long(b: &mut Bencher) {
	b.iter(|| parse::constants(LONG_FORMULA).unwrap());
}
