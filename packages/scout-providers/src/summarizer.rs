//! Recruiter-style narrative over the top ranked candidates.

use serde_json::Value;

use scout_config::LlmProviderConfig;
use scout_domain::{
	Record,
	field::{coerce_bool, stringify},
};

use crate::{Error, Result};

const SYSTEM_PROMPT: &str = "You are a recruitment consultant for technical roles. Write concise, professional candidate summaries for hiring managers. Respect the ranking order and explain why the top candidates rank higher.";

/// `(label, field names tried in order)`.
const PROFILE_LINES: [(&str, &[&str]); 6] = [
	("Location", &["location"]),
	("Experience (years)", &["years_experience", "experience"]),
	("Skills", &["skills"]),
	("Languages", &["languages"]),
	("Salary (USD)", &["desired_salary_usd", "salary"]),
	("Work preference", &["work_preference"]),
];

#[derive(Debug, Clone)]
pub struct SummaryRequest<'a> {
	pub query: &'a str,
	/// Ranked, best first.
	pub top: &'a [&'a Record],
	pub filtered_count: usize,
	pub total_count: usize,
}

pub fn build_messages(request: &SummaryRequest<'_>) -> Vec<Value> {
	let mut prompt = format!(
		"Search request: \"{}\"\nCandidates found: {} out of {}.\nTop {} candidates in ranked order:\n",
		request.query.trim(),
		request.filtered_count,
		request.total_count,
		request.top.len(),
	);

	for (index, record) in request.top.iter().enumerate() {
		prompt.push_str(&render_candidate(index + 1, record));
	}

	prompt.push_str(
		"\nWrite 4-5 sentences, under 100 words, in plain paragraphs. Cover match quality, key strengths, why the top candidates rank higher, and a practical next step.",
	);

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": prompt }),
	]
}

pub async fn summarize(cfg: &LlmProviderConfig, request: &SummaryRequest<'_>) -> Result<String> {
	let client = crate::client(cfg)?;
	let json = crate::chat(&client, cfg, &build_messages(request)).await?;
	let text = crate::message_content(&json).map(str::trim).unwrap_or_default();

	if text.is_empty() {
		return Err(Error::InvalidResponse {
			message: "Summarizer response has no text content.".to_string(),
		});
	}

	Ok(text.to_string())
}

fn render_candidate(position: usize, record: &Record) -> String {
	let name = first_present(record, &["full_name", "name"]).unwrap_or_else(|| record.id().to_string());
	let title = first_present(record, &["title"]).unwrap_or_else(|| "Not specified".to_string());
	let mut out = format!("{position}. {name} - {title}\n");

	for (label, fields) in PROFILE_LINES {
		let value = first_present(record, fields).unwrap_or_else(|| "Not specified".to_string());

		out.push_str(&format!("   - {label}: {value}\n"));
	}

	let relocate = if coerce_bool(record.get("willing_to_relocate")) { "Yes" } else { "No" };

	out.push_str(&format!("   - Willing to relocate: {relocate}\n"));

	out
}

fn first_present(record: &Record, fields: &[&str]) -> Option<String> {
	fields.iter().map(|field| stringify(record.get(field))).find(|text| !text.is_empty())
}
