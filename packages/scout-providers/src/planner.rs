//! Natural-language query to raw plan JSON via an OpenAI-compatible chat endpoint.

use serde_json::Value;

use scout_config::LlmProviderConfig;
use scout_domain::{Record, extract_json_object};

use crate::{Error, Result};

const SYSTEM_PROMPT: &str = r#"You are an applicant tracking assistant. Turn the recruiter's request into a JSON plan that a local engine applies to candidate records.

Plan shape:
{
  "filter": {
    "include": [{"field": string, "operator": string, "value": string | number | boolean}],
    "exclude": [{"field": string, "operator": string, "value": string | number | boolean}]
  },
  "rank": {"primary": string, "tie_breakers": [string]}
}

Field reference:
- years_experience (numeric): gte/lte for experience ranges
- skills (list): contains for skill matching
- location (text): contains for city or country
- title (text): contains for job titles
- willing_to_relocate (boolean): boolean
- work_preference (Remote/Onsite/Hybrid): exact
- desired_salary_usd (numeric): gte/lte for salary ranges
- visa_status (text): exact
- education_level (Bachelor's/Master's/PhD/Bootcamp): exact
- remote_experience_years (numeric): gte/lte

Operators:
- exact: case-insensitive equality
- contains: case-insensitive substring
- regex: case-insensitive regular expression
- gte / lte: numeric comparison against the value (use plain numbers, not dates)
- boolean: true/false match

Ranking: "primary" is the most important field, higher values first. Tie-breakers apply in order only when earlier fields are equal.

Include criteria are all required. Exclude criteria remove any candidate matching one of them.

Example. Request: "React developers with 5+ years in Germany"
{"filter":{"include":[{"field":"skills","operator":"contains","value":"React"},{"field":"years_experience","operator":"gte","value":5},{"field":"location","operator":"contains","value":"Germany"}]},"rank":{"primary":"years_experience","tie_breakers":["remote_experience_years","desired_salary_usd"]}}

Example. Request: "Senior remote Python developers under 150k"
{"filter":{"include":[{"field":"skills","operator":"contains","value":"Python"},{"field":"work_preference","operator":"exact","value":"Remote"},{"field":"desired_salary_usd","operator":"lte","value":150000}]},"rank":{"primary":"years_experience","tie_breakers":["remote_experience_years"]}}

Return only the JSON object."#;

#[derive(Debug, Clone)]
pub struct PlanRequest<'a> {
	pub query: &'a str,
	/// Field names present in the dataset.
	pub fields: &'a [String],
	/// Leading records sent as sample data, usually capped by `planner.sample_records`.
	pub records: &'a [Record],
	/// Size of the whole record set.
	pub record_count: usize,
}

pub fn build_messages(request: &PlanRequest<'_>) -> Result<Vec<Value>> {
	let user = format!(
		"Request: \"{}\"\nAvailable fields: {}\nCandidate count: {}\nCandidates ({} of {} shown):\n{}",
		request.query.trim(),
		request.fields.join(", "),
		request.record_count,
		request.records.len(),
		request.record_count,
		serde_json::to_string(request.records)?,
	);

	Ok(vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user }),
	])
}

/// Returns the plan object embedded in the planner reply. Transport errors fail fast;
/// replies without a usable object are retried up to `max_attempts` times.
pub async fn plan(
	cfg: &LlmProviderConfig,
	request: &PlanRequest<'_>,
	max_attempts: u32,
) -> Result<Value> {
	let client = crate::client(cfg)?;
	let messages = build_messages(request)?;

	for attempt in 1..=max_attempts.max(1) {
		let json = crate::chat(&client, cfg, &messages).await?;

		match parse_plan_json(&json) {
			Ok(parsed) => {
				tracing::debug!(provider = %cfg.provider_id, attempt, "Planner reply parsed.");

				return Ok(parsed);
			},
			Err(err) => {
				tracing::warn!(provider = %cfg.provider_id, attempt, error = %err, "Planner reply unusable.");
			},
		}
	}

	Err(Error::InvalidResponse {
		message: format!("Planner reply contained no usable plan after {max_attempts} attempts."),
	})
}

fn parse_plan_json(json: &Value) -> Result<Value> {
	if let Some(content) = crate::message_content(json) {
		return extract_json_object(content)
			.map_err(|err| Error::InvalidResponse { message: err.to_string() });
	}

	Err(Error::InvalidResponse { message: "Planner response is missing message content.".to_string() })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn reply(content: &str) -> Value {
		serde_json::json!({ "choices": [{ "message": { "content": content } }] })
	}

	#[test]
	fn parses_fenced_reply() {
		let parsed = parse_plan_json(&reply("```json\n{\"rank\": {\"primary\": \"salary\"}}\n```"))
			.expect("parse failed");

		assert_eq!(parsed["rank"]["primary"], "salary");
	}

	#[test]
	fn rejects_replies_without_objects() {
		assert!(parse_plan_json(&reply("Sorry, I cannot help.")).is_err());
		assert!(parse_plan_json(&serde_json::json!({ "id": "x" })).is_err());
	}

	#[test]
	fn user_message_carries_query_dataset_shape_and_records() {
		let fields = vec!["id".to_string(), "skills".to_string()];
		let records: Vec<Record> = serde_json::from_value(serde_json::json!([
			{ "id": 7, "skills": ["Rust"], "location": "Limassol" },
		]))
		.expect("records must parse");
		let messages = build_messages(&PlanRequest {
			query: " rust in Cyprus ",
			fields: &fields,
			records: &records,
			record_count: 42,
		})
		.expect("messages must build");
		let user = messages[1]["content"].as_str().expect("user content");

		assert_eq!(messages[0]["role"], "system");
		assert!(user.contains("\"rust in Cyprus\""));
		assert!(user.contains("id, skills"));
		assert!(user.contains("Candidates (1 of 42 shown)"));
		assert!(user.contains("\"location\":\"Limassol\""));
	}

	#[test]
	fn prompt_does_not_offer_date_comparisons() {
		assert!(SYSTEM_PROMPT.contains("gte / lte: numeric comparison"));
		assert!(!SYSTEM_PROMPT.contains("or date"));
	}
}
