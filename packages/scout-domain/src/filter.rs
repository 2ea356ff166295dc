use serde::{Deserialize, Serialize};

use crate::{predicate::Criterion, record::Record};

/// Include criteria are AND-combined; exclude criteria drop every record they match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPlan {
	#[serde(default)]
	pub include: Vec<Criterion>,
	#[serde(default)]
	pub exclude: Vec<Criterion>,
}
impl FilterPlan {
	pub fn is_empty(&self) -> bool {
		self.include.is_empty() && self.exclude.is_empty()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterImpact {
	pub candidate_count_pre: usize,
	pub candidate_count_post: usize,
	pub dropped_total: usize,
	pub stages: Vec<FilterStageImpact>,
}

/// Records dropped by one criterion, in application order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterStageImpact {
	pub reason: String,
	pub dropped: usize,
}

#[derive(Debug)]
pub struct FilterOutcome<'a> {
	pub records: Vec<&'a Record>,
	pub impact: FilterImpact,
}

/// Applies `plan` to `records`, preserving their relative order. `None` keeps everything.
pub fn filter_records<'a>(plan: Option<&FilterPlan>, records: &'a [Record]) -> Vec<&'a Record> {
	filter_with_impact(plan, records).records
}

pub fn filter_with_impact<'a>(plan: Option<&FilterPlan>, records: &'a [Record]) -> FilterOutcome<'a> {
	let pre = records.len();
	let mut kept: Vec<&Record> = records.iter().collect();
	let mut stages = Vec::new();
	let Some(plan) = plan else {
		tracing::warn!("Filter plan is missing or malformed. Keeping all records.");

		return FilterOutcome {
			records: kept,
			impact: FilterImpact {
				candidate_count_pre: pre,
				candidate_count_post: pre,
				..FilterImpact::default()
			},
		};
	};

	for criterion in &plan.include {
		let predicate = criterion.compile();
		let before = kept.len();

		kept.retain(|record| predicate.matches(record));

		stages.push(FilterStageImpact {
			reason: format!("include:{}", criterion.label()),
			dropped: before - kept.len(),
		});
	}
	for criterion in &plan.exclude {
		let predicate = criterion.compile();
		let before = kept.len();

		kept.retain(|record| !predicate.matches(record));

		stages.push(FilterStageImpact {
			reason: format!("exclude:{}", criterion.label()),
			dropped: before - kept.len(),
		});
	}

	let post = kept.len();

	tracing::debug!(pre, post, criteria = stages.len(), "Filter plan applied.");

	FilterOutcome {
		records: kept,
		impact: FilterImpact {
			candidate_count_pre: pre,
			candidate_count_post: post,
			dropped_total: pre - post,
			stages,
		},
	}
}
