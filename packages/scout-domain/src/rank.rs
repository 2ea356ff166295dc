use std::cmp::Ordering;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::{
	field::{FieldTable, SortKey, resolve_value},
	record::{Record, RecordId},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankPlan {
	pub primary: String,
	#[serde(default)]
	pub tie_breakers: Vec<String>,
}
impl RankPlan {
	pub fn new(primary: impl Into<String>) -> Self {
		Self { primary: primary.into(), tie_breakers: Vec::new() }
	}

	pub fn with_tie_breaker(mut self, field: impl Into<String>) -> Self {
		self.tie_breakers.push(field.into());

		self
	}

	/// `primary` followed by the tie-breakers, in priority order.
	pub fn fields(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.primary.as_str()).chain(self.tie_breakers.iter().map(String::as_str))
	}
}

/// Keeps the records whose id is in `ids` and orders them descending by each plan field in
/// turn. The sort is stable: records equal on every field keep their dataset order.
/// `None` keeps dataset order.
pub fn rank_records<'a>(
	ids: &[RecordId],
	plan: Option<&RankPlan>,
	records: &'a [Record],
	table: &FieldTable,
) -> Vec<&'a Record> {
	let wanted: AHashSet<&RecordId> = ids.iter().collect();
	let subset: Vec<&Record> = records.iter().filter(|record| wanted.contains(record.id())).collect();
	let Some(plan) = plan else {
		tracing::warn!("Rank plan is missing or malformed. Keeping dataset order.");

		return subset;
	};
	let fields: Vec<&str> = plan.fields().collect();
	let mut keyed: Vec<(Vec<SortKey>, &Record)> = subset
		.into_iter()
		.map(|record| {
			(fields.iter().map(|field| resolve_value(record, field, table)).collect(), record)
		})
		.collect();

	unify_mixed_columns(&mut keyed, fields.len());

	keyed.sort_by(|(left, _), (right, _)| cmp_keys_desc(left, right));

	tracing::debug!(fields = ?fields, ranked = keyed.len(), "Rank plan applied.");

	keyed.into_iter().map(|(_, record)| record).collect()
}

/// In a column holding any number, missing and numeric-looking text values become numbers.
/// Text that is not a number stays text and ranks below every number.
fn unify_mixed_columns(keyed: &mut [(Vec<SortKey>, &Record)], width: usize) {
	for column in 0..width {
		if !keyed.iter().any(|(keys, _)| keys[column].is_number()) {
			continue;
		}

		for (keys, _) in keyed.iter_mut() {
			if let Some(number) = keys[column].as_number() {
				keys[column] = SortKey::Number(number);
			}
		}
	}
}

fn cmp_keys_desc(left: &[SortKey], right: &[SortKey]) -> Ordering {
	for (left, right) in left.iter().zip(right) {
		match right.cmp(left) {
			Ordering::Equal => continue,
			other => return other,
		}
	}

	Ordering::Equal
}
