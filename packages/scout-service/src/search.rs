//! The staged search pipeline: plan, filter, rank, aggregate, then optionally narrate.

use serde::{Deserialize, Serialize};

use scout_domain::{
	FilterImpact, Plan, PlanDefaults, Record, Summary, aggregate, filter_with_impact, rank_records,
	record_ids,
};
use scout_providers::{planner::PlanRequest, summarizer::SummaryRequest};

use crate::{Error, Result, ScoutService};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	/// Falls back to `search.default_limit`.
	pub limit: Option<usize>,
	#[serde(default)]
	pub summarize: bool,
}
impl SearchRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self { query: query.into(), limit: None, summarize: false }
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
	pub query: String,
	/// The normalized plan that was applied.
	pub plan: Plan,
	/// Ranked and truncated to the request limit.
	pub candidates: Vec<Record>,
	pub filtered_count: usize,
	pub total_count: usize,
	pub filter_impact: FilterImpact,
	/// Statistics over every ranked record, not only the returned page.
	pub summary: Summary,
	pub narrative: Option<String>,
}

impl ScoutService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		let limit = req.limit.unwrap_or(self.cfg.search.default_limit);

		if limit == 0 {
			return Err(Error::InvalidRequest { message: "limit must be greater than zero.".to_string() });
		}

		let records = self.dataset.records();
		let sample = &records[..self.cfg.planner.sample_records.min(records.len())];
		let plan_request = PlanRequest {
			query,
			fields: self.dataset.field_names(),
			records: sample,
			record_count: records.len(),
		};
		let raw_plan = self.providers.planner.plan(&self.cfg, plan_request).await?;
		let defaults = PlanDefaults { rank_primary: self.cfg.planner.default_rank_primary.clone() };
		let plan = Plan::from_value(&raw_plan, &defaults);

		tracing::debug!(?plan, "Plan normalized.");

		let filtered = filter_with_impact(plan.filter.as_ref(), records);
		let filtered_ids = record_ids(filtered.records.iter().copied());

		tracing::info!(
			total = records.len(),
			filtered = filtered_ids.len(),
			dropped = filtered.impact.dropped_total,
			"Filter stage complete."
		);

		let ranked = rank_records(&filtered_ids, plan.rank.as_ref(), records, &self.table);
		let summary = aggregate(&record_ids(ranked.iter().copied()), records);

		tracing::info!(
			ranked = ranked.len(),
			avg_experience = summary.avg_experience,
			"Rank and aggregate stages complete."
		);

		let narrative = if req.summarize {
			self.narrate(query, &ranked, filtered_ids.len()).await
		} else {
			None
		};
		let candidates = ranked.iter().take(limit).map(|record| (*record).clone()).collect();

		Ok(SearchResponse {
			query: query.to_string(),
			plan,
			candidates,
			filtered_count: filtered_ids.len(),
			total_count: records.len(),
			filter_impact: filtered.impact,
			summary,
			narrative,
		})
	}

	async fn narrate(&self, query: &str, ranked: &[&Record], filtered_count: usize) -> Option<String> {
		let top_k = self.cfg.search.summary_top_k.min(ranked.len());
		let request = SummaryRequest {
			query,
			top: &ranked[..top_k],
			filtered_count,
			total_count: self.dataset.len(),
		};

		match self.providers.summarizer.summarize(&self.cfg, request).await {
			Ok(text) => Some(text),
			Err(err) => {
				tracing::warn!(error = %err, "Narrative summary failed. Returning results without it.");

				None
			},
		}
	}
}
