//! Keyword, location and experience-band browsing without a planner.

use std::{collections::BTreeSet, str::FromStr};

use crate::{
	field::{
		EXPERIENCE_FIELD, INLINE_LIST_SEPARATOR, SALARY_FIELD, SKILLS_FIELD, multi_values,
		parse_number, stringify,
	},
	record::Record,
};

const TERM_FIELDS: [&str; 3] = ["name", "title", "location"];
const LOCATION_FIELD: &str = "location";
const NAME_FIELD: &str = "name";

#[derive(Debug, thiserror::Error)]
#[error("Unknown {kind} '{value}'.")]
pub struct ParseOptionError {
	kind: &'static str,
	value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceLevel {
	/// Up to 3 years.
	Junior,
	/// More than 3 and up to 6 years.
	Mid,
	/// More than 6 years.
	Senior,
}
impl ExperienceLevel {
	fn contains(&self, years: f64) -> bool {
		match self {
			Self::Junior => years <= 3.0,
			Self::Mid => years > 3.0 && years <= 6.0,
			Self::Senior => years > 6.0,
		}
	}
}
impl FromStr for ExperienceLevel {
	type Err = ParseOptionError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"junior" => Ok(Self::Junior),
			"mid" => Ok(Self::Mid),
			"senior" => Ok(Self::Senior),
			_ => Err(ParseOptionError { kind: "experience level", value: raw.to_string() }),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
	Name,
	Experience,
	Salary,
}
impl FromStr for SortBy {
	type Err = ParseOptionError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"name" => Ok(Self::Name),
			"experience" => Ok(Self::Experience),
			"salary" => Ok(Self::Salary),
			_ => Err(ParseOptionError { kind: "sort key", value: raw.to_string() }),
		}
	}
}

/// Case-insensitive match on name, title, location or any single skill. Blank keeps all.
pub fn filter_by_term<'a>(records: Vec<&'a Record>, term: &str) -> Vec<&'a Record> {
	let term = term.trim().to_lowercase();

	if term.is_empty() {
		return records;
	}

	records
		.into_iter()
		.filter(|record| {
			TERM_FIELDS.iter().any(|field| stringify(record.get(field)).to_lowercase().contains(&term))
				|| multi_values(record.get(SKILLS_FIELD), INLINE_LIST_SEPARATOR)
					.iter()
					.any(|skill| skill.to_lowercase().contains(&term))
		})
		.collect()
}

pub fn filter_by_location<'a>(records: Vec<&'a Record>, location: &str) -> Vec<&'a Record> {
	let location = location.trim().to_lowercase();

	if location.is_empty() {
		return records;
	}

	records
		.into_iter()
		.filter(|record| stringify(record.get(LOCATION_FIELD)).to_lowercase().contains(&location))
		.collect()
}

pub fn filter_by_level(records: Vec<&Record>, level: ExperienceLevel) -> Vec<&Record> {
	records.into_iter().filter(|record| level.contains(number_of(record, EXPERIENCE_FIELD))).collect()
}

/// Stable sort: name ascending, experience and salary descending.
pub fn sort_records(mut records: Vec<&Record>, sort_by: SortBy) -> Vec<&Record> {
	match sort_by {
		SortBy::Name => records.sort_by_cached_key(|record| stringify(record.get(NAME_FIELD)).to_lowercase()),
		SortBy::Experience => records.sort_by(|a, b| {
			number_of(b, EXPERIENCE_FIELD).total_cmp(&number_of(a, EXPERIENCE_FIELD))
		}),
		SortBy::Salary =>
			records.sort_by(|a, b| number_of(b, SALARY_FIELD).total_cmp(&number_of(a, SALARY_FIELD))),
	}

	records
}

/// Sorted, deduplicated, non-empty locations.
pub fn unique_locations(records: &[Record]) -> Vec<String> {
	records
		.iter()
		.map(|record| stringify(record.get(LOCATION_FIELD)).trim().to_string())
		.filter(|location| !location.is_empty())
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}

fn number_of(record: &Record, field: &str) -> f64 {
	record.get(field).and_then(parse_number).unwrap_or(0.0)
}
