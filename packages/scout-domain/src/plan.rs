//! Normalizes planner output into the canonical [`Plan`].
//!
//! Planners are free-text LLMs, so nothing here fails: malformed sections become `None`
//! (identity behaviour downstream) and malformed criteria are dropped with a warning.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
	filter::FilterPlan,
	predicate::{Criterion, CriterionValue, Operator},
	rank::RankPlan,
};

pub const DEFAULT_RANK_PRIMARY: &str = "years_experience";

#[derive(Debug, thiserror::Error)]
pub enum PlanExtractError {
	#[error("Planner reply contains no JSON object.")]
	MissingObject,
	#[error("Planner reply JSON is invalid: {0}")]
	InvalidJson(#[from] serde_json::Error),
	#[error("Planner reply JSON must be an object.")]
	NotAnObject,
}

#[derive(Debug, Clone)]
pub struct PlanDefaults {
	/// Ranking field used when the planner omits `rank` entirely.
	pub rank_primary: String,
}
impl Default for PlanDefaults {
	fn default() -> Self {
		Self { rank_primary: DEFAULT_RANK_PRIMARY.to_string() }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plan {
	pub filter: Option<FilterPlan>,
	pub rank: Option<RankPlan>,
}
impl Plan {
	pub fn from_value(raw: &Value, defaults: &PlanDefaults) -> Self {
		let Some(obj) = raw.as_object() else {
			tracing::warn!("Plan is not an object. Falling back to identity filter and order.");

			return Self::default();
		};
		let filter = match obj.get("filter") {
			None | Some(Value::Null) => Some(FilterPlan::default()),
			Some(raw) => parse_filter_plan(raw),
		};
		let rank = match obj.get("rank") {
			None | Some(Value::Null) => Some(RankPlan::new(defaults.rank_primary.clone())),
			Some(raw) => parse_rank_plan(raw),
		};

		Self { filter, rank }
	}
}

pub fn parse_filter_plan(raw: &Value) -> Option<FilterPlan> {
	let Some(obj) = raw.as_object() else {
		tracing::warn!("Filter plan is not an object.");

		return None;
	};

	Some(FilterPlan {
		include: parse_criteria(obj, "include"),
		exclude: parse_criteria(obj, "exclude"),
	})
}

pub fn parse_rank_plan(raw: &Value) -> Option<RankPlan> {
	let obj = raw.as_object()?;
	let Some(primary) = non_empty_str(obj.get("primary")) else {
		tracing::warn!("Rank plan has no usable primary field.");

		return None;
	};
	let tie_breakers = obj
		.get("tie_breakers")
		.and_then(Value::as_array)
		.map(|items| items.iter().filter_map(|item| non_empty_str(Some(item))).collect())
		.unwrap_or_default();

	Some(RankPlan { primary, tie_breakers })
}

/// Reads one criterion. `operator` wins over its legacy synonym `type`.
pub fn parse_criterion(raw: &Value) -> Option<Criterion> {
	let obj = raw.as_object()?;
	let field = non_empty_str(obj.get("field"))?;
	let operator = obj
		.get("operator")
		.and_then(Value::as_str)
		.or_else(|| obj.get("type").and_then(Value::as_str))
		.map(Operator::parse)
		.unwrap_or_default();
	let value = obj.get("value").and_then(CriterionValue::from_value)?;

	Some(Criterion { field, operator, value })
}

/// Parses the JSON object spanning the first `{` to the last `}` of a free-text reply.
pub fn extract_json_object(text: &str) -> Result<Value, PlanExtractError> {
	let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
		return Err(PlanExtractError::MissingObject);
	};

	if start >= end {
		return Err(PlanExtractError::MissingObject);
	}

	let value: Value = serde_json::from_str(&text[start..=end])?;

	if !value.is_object() {
		return Err(PlanExtractError::NotAnObject);
	}

	Ok(value)
}

fn parse_criteria(obj: &Map<String, Value>, key: &str) -> Vec<Criterion> {
	let Some(items) = obj.get(key).and_then(Value::as_array) else {
		return Vec::new();
	};

	items
		.iter()
		.enumerate()
		.filter_map(|(index, item)| {
			let parsed = parse_criterion(item);

			if parsed.is_none() {
				tracing::warn!(list = key, index, "Dropping malformed filter criterion.");
			}

			parsed
		})
		.collect()
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
	let trimmed = value?.as_str()?.trim();

	if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}
