use std::cmp::Ordering;

use ahash::AHashMap;
use serde_json::Value;
use time::{
	Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
	macros::format_description,
};

use crate::record::Record;

pub const SKILLS_FIELD: &str = "skills";
pub const SKILLS_COUNT_FIELD: &str = "skills_count";
pub const EXPERIENCE_FIELD: &str = "experience";
pub const SALARY_FIELD: &str = "salary";

/// Separator used when a multi-value field arrives as one string.
pub const INLINE_LIST_SEPARATOR: char = ',';

const NUMERIC_FIELDS: [&str; 8] = [
	"years_experience",
	"experience",
	"desired_salary_usd",
	"salary",
	"remote_experience_years",
	"age",
	"notice_period_weeks",
	"availability_weeks",
];
const MULTI_VALUE_FIELDS: [&str; 3] = ["skills", "languages", "tags"];
const BOOLEAN_FIELDS: [&str; 2] = ["willing_to_relocate", "open_to_contract"];
const DATE_MARKER: &str = "date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
	Numeric,
	Text,
	MultiValue,
	Date,
	Boolean,
}

/// Declarative field-name classification consulted by the resolver and the loader.
///
/// Names not in the table are classified as [`FieldKind::Date`] when they contain `date`,
/// and as [`FieldKind::Text`] otherwise.
#[derive(Debug, Clone)]
pub struct FieldTable {
	kinds: AHashMap<String, FieldKind>,
}
impl FieldTable {
	pub fn builtin() -> Self {
		let mut kinds = AHashMap::new();

		for name in NUMERIC_FIELDS {
			kinds.insert(name.to_string(), FieldKind::Numeric);
		}
		for name in MULTI_VALUE_FIELDS {
			kinds.insert(name.to_string(), FieldKind::MultiValue);
		}
		for name in BOOLEAN_FIELDS {
			kinds.insert(name.to_string(), FieldKind::Boolean);
		}

		Self { kinds }
	}

	pub fn from_config(fields: &scout_config::Fields) -> Self {
		let mut table = Self::builtin();

		for (names, kind) in [
			(&fields.numeric, FieldKind::Numeric),
			(&fields.date, FieldKind::Date),
			(&fields.boolean, FieldKind::Boolean),
			(&fields.multi_value, FieldKind::MultiValue),
		] {
			for name in names {
				table.kinds.insert(name.clone(), kind);
			}
		}

		table
	}

	pub fn with_kind(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
		self.kinds.insert(name.into(), kind);

		self
	}

	pub fn kind(&self, field: &str) -> FieldKind {
		if let Some(kind) = self.kinds.get(field) {
			return *kind;
		}
		if field.contains(DATE_MARKER) {
			return FieldKind::Date;
		}

		FieldKind::Text
	}
}
impl Default for FieldTable {
	fn default() -> Self {
		Self::builtin()
	}
}

/// A resolved, comparable field value.
#[derive(Debug, Clone)]
pub enum SortKey {
	Number(f64),
	Text(String),
}
impl SortKey {
	pub fn is_number(&self) -> bool {
		matches!(self, Self::Number(_))
	}

	/// Blank text reads as `0`, numeric text as its value, anything else as `None`.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(number) => Some(*number),
			Self::Text(text) => {
				let trimmed = text.trim();

				if trimmed.is_empty() {
					return Some(0.0);
				}

				trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
			},
		}
	}
}
/// Numbers compare numerically, text lexicographically, and every number sorts above every
/// text value.
impl Ord for SortKey {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Self::Number(left), Self::Number(right)) => left.total_cmp(right),
			(Self::Text(left), Self::Text(right)) => left.cmp(right),
			(Self::Number(_), Self::Text(_)) => Ordering::Greater,
			(Self::Text(_), Self::Number(_)) => Ordering::Less,
		}
	}
}
impl PartialOrd for SortKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
impl PartialEq for SortKey {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}
impl Eq for SortKey {}

/// Resolves `field` on `record` to a comparable value. Never fails: numeric and date fields
/// default to `0`, everything else to the empty string.
pub fn resolve_value(record: &Record, field: &str, table: &FieldTable) -> SortKey {
	if field == SKILLS_COUNT_FIELD {
		let count = multi_values(record.get(SKILLS_FIELD), INLINE_LIST_SEPARATOR).len();

		return SortKey::Number(count as f64);
	}

	let raw = record.get(field);

	match table.kind(field) {
		FieldKind::Numeric => SortKey::Number(raw.and_then(parse_number).unwrap_or(0.0)),
		FieldKind::Date => SortKey::Number(raw.and_then(parse_timestamp_ms).unwrap_or(0.0)),
		FieldKind::Boolean => SortKey::Number(if coerce_bool(raw) { 1.0 } else { 0.0 }),
		FieldKind::Text | FieldKind::MultiValue => raw_key(raw),
	}
}

/// Renders a value the way it is compared by text operators. Missing and null are empty.
pub fn stringify(value: Option<&Value>) -> String {
	match value {
		None | Some(Value::Null) => String::new(),
		Some(Value::String(text)) => text.clone(),
		Some(Value::Bool(flag)) => flag.to_string(),
		Some(Value::Number(number)) => format_number(number),
		Some(Value::Array(items)) =>
			items.iter().map(|item| stringify(Some(item))).collect::<Vec<_>>().join(","),
		Some(object @ Value::Object(_)) => object.to_string(),
	}
}

/// Parses a float from the leading numeric prefix, so `"5 years"` is `5`.
pub fn parse_number(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64().filter(|number| number.is_finite()),
		Value::String(text) => parse_leading_f64(text),
		Value::Array(_) => parse_leading_f64(&stringify(Some(value))),
		_ => None,
	}
}

pub fn parse_leading_f64(raw: &str) -> Option<f64> {
	let text = raw.trim_start();
	let bytes = text.as_bytes();
	let mut end = 0;

	if matches!(bytes.first(), Some(b'+' | b'-')) {
		end = 1;
	}

	let int_start = end;

	while end < bytes.len() && bytes[end].is_ascii_digit() {
		end += 1;
	}

	let mut digits = end - int_start;

	if end < bytes.len() && bytes[end] == b'.' {
		let frac_start = end + 1;
		let mut frac_end = frac_start;

		while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
			frac_end += 1;
		}

		if digits + (frac_end - frac_start) > 0 {
			digits += frac_end - frac_start;
			end = frac_end;
		}
	}
	if digits == 0 {
		return None;
	}
	if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
		let mut exp_end = end + 1;

		if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
			exp_end += 1;
		}

		let exp_digits_start = exp_end;

		while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
			exp_end += 1;
		}

		if exp_end > exp_digits_start {
			end = exp_end;
		}
	}

	text[..end].parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Epoch milliseconds. Accepts RFC 3339, `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` (UTC), or a
/// JSON number that already holds milliseconds.
pub fn parse_timestamp_ms(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64().filter(|number| number.is_finite()),
		Value::String(text) => parse_timestamp_text(text.trim()),
		_ => None,
	}
}

/// Strict boolean coercion: `true`, `"true"`, `"1"` and non-zero numbers are true.
pub fn coerce_bool(value: Option<&Value>) -> bool {
	match value {
		Some(Value::Bool(flag)) => *flag,
		Some(Value::String(text)) => is_truthy_text(text),
		Some(Value::Number(number)) => number.as_f64().map(|number| number != 0.0).unwrap_or(false),
		_ => false,
	}
}

pub fn is_truthy_text(text: &str) -> bool {
	let trimmed = text.trim();

	trimmed.eq_ignore_ascii_case("true") || trimmed == "1"
}

/// Splits a multi-value field into trimmed, non-empty tokens. Arrays are used as-is.
pub fn multi_values(value: Option<&Value>, separator: char) -> Vec<String> {
	match value {
		Some(Value::Array(items)) => items
			.iter()
			.map(|item| stringify(Some(item)).trim().to_string())
			.filter(|item| !item.is_empty())
			.collect(),
		Some(Value::String(text)) => text
			.split(separator)
			.map(str::trim)
			.filter(|item| !item.is_empty())
			.map(str::to_string)
			.collect(),
		_ => Vec::new(),
	}
}

pub fn format_f64(number: f64) -> String {
	format!("{number}")
}

fn format_number(number: &serde_json::Number) -> String {
	if let Some(int) = number.as_i64() {
		return int.to_string();
	}
	if let Some(uint) = number.as_u64() {
		return uint.to_string();
	}

	number.as_f64().map(format_f64).unwrap_or_else(|| number.to_string())
}

fn raw_key(value: Option<&Value>) -> SortKey {
	match value {
		Some(Value::Number(number)) =>
			number.as_f64().map(SortKey::Number).unwrap_or_else(|| SortKey::Text(number.to_string())),
		other => SortKey::Text(stringify(other)),
	}
}

fn parse_timestamp_text(text: &str) -> Option<f64> {
	if text.is_empty() {
		return None;
	}
	if let Ok(datetime) = OffsetDateTime::parse(text, &Rfc3339) {
		return Some(epoch_millis(datetime));
	}
	if let Ok(datetime) =
		PrimitiveDateTime::parse(text, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
	{
		return Some(epoch_millis(datetime.assume_utc()));
	}
	if let Ok(date) = Date::parse(text, format_description!("[year]-[month]-[day]")) {
		return Some(epoch_millis(date.midnight().assume_utc()));
	}

	None
}

fn epoch_millis(datetime: OffsetDateTime) -> f64 {
	(datetime.unix_timestamp_nanos() / 1_000_000) as f64
}
