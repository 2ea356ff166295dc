use scout_cli::Table;
use scout_domain::{Record, field::stringify};
use scout_service::SearchResponse;

const CANDIDATE_COLUMNS: [(&str, &[&str]); 7] = [
	("ID", &["id"]),
	("NAME", &["name", "full_name"]),
	("TITLE", &["title"]),
	("LOCATION", &["location"]),
	("YEARS", &["experience", "years_experience"]),
	("SALARY", &["salary", "desired_salary_usd"]),
	("SKILLS", &["skills"]),
];

pub fn render_candidates(records: &[&Record]) -> String {
	if records.is_empty() {
		return "No candidates matched.\n".to_string();
	}

	let mut table = Table::new(CANDIDATE_COLUMNS.iter().map(|(header, _)| *header));

	for record in records {
		table.push_row(
			CANDIDATE_COLUMNS
				.iter()
				.map(|(_, fields)| {
					fields
						.iter()
						.map(|field| stringify(record.get(field)))
						.find(|text| !text.is_empty())
						.unwrap_or_default()
				})
				.collect(),
		);
	}

	table.render()
}

pub fn render_search(response: &SearchResponse) -> String {
	let mut out = format!(
		"{} of {} candidates matched \"{}\". Average experience: {} years.\n",
		response.filtered_count, response.total_count, response.query, response.summary.avg_experience,
	);

	if !response.summary.top_skills.is_empty() {
		let skills: Vec<String> = response
			.summary
			.top_skills
			.iter()
			.map(|entry| format!("{} ({})", entry.skill, entry.count))
			.collect();

		out.push_str(&format!("Top skills: {}\n", skills.join(", ")));
	}

	out.push('\n');

	let candidates: Vec<&Record> = response.candidates.iter().collect();

	out.push_str(&render_candidates(&candidates));

	if let Some(narrative) = &response.narrative {
		out.push('\n');
		out.push_str(narrative);
		out.push('\n');
	}

	out
}
