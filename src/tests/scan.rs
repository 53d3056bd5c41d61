use crate::{
	dice::roller::{Iter as IterRoller, Os as OsRoller},
	formula::{Error as FormulaError, Mode},
	parse::Error as ParseError,
	scan::{self, Error},
};

#[test]
fn find_stops_at_whitespace() {
	let found = scan::find("Roll 2d6+3 then d20+1d4\nand 1d8");
	let formulas = found.iter().map(|candidate| candidate.formula).collect::<Vec<_>>();
	assert_eq!(formulas, ["2d6+3", "d20+1d4", "1d8"]);
}

#[test]
fn find_spans() {
	let text = "a 1d6 b";
	let found = scan::find(text);
	assert_eq!(found.len(), 1);
	assert_eq!(found[0].span, 2..5);
	assert_eq!(&text[found[0].span.clone()], "1d6");
}

#[test]
fn find_keeps_trailing_punctuation() {
	let found = scan::find("Damage: 1d20+5, then");
	assert_eq!(found[0].formula, "1d20+5,");
}

#[test]
fn find_crlf() {
	let found = scan::find("2d6+3\r\n1d4");
	let formulas = found.iter().map(|candidate| candidate.formula).collect::<Vec<_>>();
	assert_eq!(formulas, ["2d6+3", "1d4"]);
}

#[test]
fn find_nothing() {
	assert!(scan::find("just some words, no rolls").is_empty());
	assert!(scan::find("").is_empty());
}

#[test]
fn evaluate_no_formula() {
	let result = scan::evaluate("nothing here", Mode::Average, &mut OsRoller);
	assert!(matches!(result, Err(Error::NoFormulaFound)));
}

#[test]
fn evaluate_average_each_formula() {
	let outcomes = scan::evaluate("2d6+3 and 3d8+5+2", Mode::Average, &mut OsRoller).unwrap();
	let totals = outcomes.iter().map(|outcome| *outcome.result.as_ref().unwrap()).collect::<Vec<_>>();
	assert_eq!(totals, [10, 21]);
}

#[test]
fn evaluate_failure_is_isolated() {
	let outcomes = scan::evaluate("d6 2d6+3", Mode::Simulate, &mut IterRoller::new([0, 1])).unwrap();
	assert_eq!(outcomes.len(), 2);

	assert_eq!(outcomes[0].formula, "d6");
	assert!(matches!(
		outcomes[0].result,
		Err(FormulaError::Parse(ParseError::NoDice { .. }))
	));

	assert_eq!(outcomes[1].formula, "2d6+3");
	assert_eq!(outcomes[1].result.as_ref().unwrap(), &(1 + 2 + 3));
}

#[test]
fn evaluate_malformed_is_isolated() {
	let outcomes = scan::evaluate("1d0 1d20", Mode::Average, &mut OsRoller).unwrap();
	assert!(matches!(
		outcomes[0].result,
		Err(FormulaError::Parse(ParseError::MalformedTerm { .. }))
	));
	assert_eq!(outcomes[1].result.as_ref().unwrap(), &11);
}
