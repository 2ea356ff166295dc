use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::{
	field::{EXPERIENCE_FIELD, INLINE_LIST_SEPARATOR, SKILLS_FIELD, multi_values, parse_number},
	record::{Record, RecordId},
};

pub const TOP_SKILLS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
	pub count: usize,
	pub avg_experience: f64,
	pub top_skills: Vec<SkillCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCount {
	pub skill: String,
	pub count: usize,
}

/// Statistics over the records whose id is in `ids`.
pub fn aggregate(ids: &[RecordId], records: &[Record]) -> Summary {
	let wanted: AHashSet<&RecordId> = ids.iter().collect();
	let subset: Vec<&Record> = records.iter().filter(|record| wanted.contains(record.id())).collect();
	let count = subset.len();
	let total_experience: f64 = subset
		.iter()
		.map(|record| record.get(EXPERIENCE_FIELD).and_then(parse_number).unwrap_or(0.0))
		.sum();
	let avg_experience =
		if count > 0 { (total_experience / count as f64 * 10.0).round() / 10.0 } else { 0.0 };

	Summary { count, avg_experience, top_skills: top_skills(&subset, TOP_SKILLS_LIMIT) }
}

fn top_skills(subset: &[&Record], limit: usize) -> Vec<SkillCount> {
	let mut positions: AHashMap<String, usize> = AHashMap::new();
	let mut counts: Vec<SkillCount> = Vec::new();

	for record in subset {
		for skill in multi_values(record.get(SKILLS_FIELD), INLINE_LIST_SEPARATOR) {
			if let Some(position) = positions.get(&skill) {
				counts[*position].count += 1;

				continue;
			}

			positions.insert(skill.clone(), counts.len());
			counts.push(SkillCount { skill, count: 1 });
		}
	}

	// Stable, so equal counts stay in first-seen order.
	counts.sort_by(|a, b| b.count.cmp(&a.count));
	counts.truncate(limit);

	counts
}
