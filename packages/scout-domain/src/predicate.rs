use std::fmt::{Display, Formatter};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
	field::{self, coerce_bool, is_truthy_text, parse_leading_f64, parse_number, stringify},
	record::Record,
};

const MAX_REGEX_SIZE: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
	#[default]
	Exact,
	Contains,
	Regex,
	Gte,
	Lte,
	Boolean,
}
impl Operator {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Exact => "exact",
			Self::Contains => "contains",
			Self::Regex => "regex",
			Self::Gte => "gte",
			Self::Lte => "lte",
			Self::Boolean => "boolean",
		}
	}

	/// Case-insensitive. Unknown names fall back to [`Operator::Exact`].
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"contains" => Self::Contains,
			"regex" => Self::Regex,
			"gte" => Self::Gte,
			"lte" => Self::Lte,
			"boolean" => Self::Boolean,
			_ => Self::Exact,
		}
	}
}
impl Display for Operator {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
	Bool(bool),
	Number(f64),
	Text(String),
}
impl CriterionValue {
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Bool(flag) => Some(Self::Bool(*flag)),
			Value::Number(number) => number.as_f64().map(Self::Number),
			Value::String(text) => Some(Self::Text(text.clone())),
			_ => None,
		}
	}

	pub fn to_text(&self) -> String {
		match self {
			Self::Bool(flag) => flag.to_string(),
			Self::Number(number) => field::format_f64(*number),
			Self::Text(text) => text.clone(),
		}
	}

	fn to_number(&self) -> Option<f64> {
		match self {
			Self::Bool(_) => None,
			Self::Number(number) => Some(*number).filter(|number| number.is_finite()),
			Self::Text(text) => parse_leading_f64(text),
		}
	}

	fn to_bool(&self) -> bool {
		match self {
			Self::Bool(flag) => *flag,
			Self::Number(number) => *number != 0.0,
			Self::Text(text) => is_truthy_text(text),
		}
	}
}
impl From<&str> for CriterionValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}
impl From<f64> for CriterionValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}
impl From<bool> for CriterionValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

/// A single field/operator/value test in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
	pub field: String,
	#[serde(default)]
	pub operator: Operator,
	pub value: CriterionValue,
}
impl Criterion {
	pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<CriterionValue>) -> Self {
		Self { field: field.into(), operator, value: value.into() }
	}

	/// Prepares the operand once so it can be tested against many records.
	pub fn compile(&self) -> Predicate {
		let test = match self.operator {
			Operator::Exact => Test::Exact(self.value.to_text().to_lowercase()),
			Operator::Contains => Test::Contains(self.value.to_text().to_lowercase()),
			Operator::Regex => Test::Regex(
				RegexBuilder::new(&self.value.to_text())
					.case_insensitive(true)
					.size_limit(MAX_REGEX_SIZE)
					.build()
					.ok(),
			),
			Operator::Gte => Test::Gte(self.value.to_number()),
			Operator::Lte => Test::Lte(self.value.to_number()),
			Operator::Boolean => Test::Boolean(self.value.to_bool()),
		};

		Predicate { field: self.field.clone(), test }
	}

	pub fn label(&self) -> String {
		format!("{}:{}", self.operator, self.field)
	}
}

#[derive(Debug, Clone)]
pub struct Predicate {
	field: String,
	test: Test,
}
impl Predicate {
	pub fn field(&self) -> &str {
		&self.field
	}

	pub fn matches(&self, record: &Record) -> bool {
		self.matches_value(record.get(&self.field))
	}

	pub fn matches_value(&self, value: Option<&Value>) -> bool {
		match &self.test {
			Test::Exact(operand) => stringify(value).to_lowercase() == *operand,
			Test::Contains(operand) => stringify(value).to_lowercase().contains(operand.as_str()),
			Test::Regex(Some(regex)) => regex.is_match(&stringify(value)),
			Test::Regex(None) => false,
			Test::Gte(operand) => compare_numbers(value, *operand, |left, right| left >= right),
			Test::Lte(operand) => compare_numbers(value, *operand, |left, right| left <= right),
			Test::Boolean(operand) => coerce_bool(value) == *operand,
		}
	}
}

#[derive(Debug, Clone)]
enum Test {
	Exact(String),
	Contains(String),
	/// `None` when the pattern failed to compile.
	Regex(Option<Regex>),
	Gte(Option<f64>),
	Lte(Option<f64>),
	Boolean(bool),
}

/// Tests a raw field value against a criterion. Unparsable numeric comparisons and invalid
/// patterns evaluate to `false`.
pub fn matches(value: Option<&Value>, criterion: &Criterion) -> bool {
	criterion.compile().matches_value(value)
}

fn compare_numbers(value: Option<&Value>, operand: Option<f64>, cmp: fn(f64, f64) -> bool) -> bool {
	let Some(operand) = operand else {
		return false;
	};
	let Some(left) = value.and_then(parse_number) else {
		return false;
	};

	cmp(left, operand)
}
