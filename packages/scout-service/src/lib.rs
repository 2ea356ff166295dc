pub mod search;

mod error;

pub use error::{Error, Result};
pub use search::{SearchRequest, SearchResponse};

use std::{future::Future, path::Path, pin::Pin, sync::Arc};

use serde_json::Value;

use scout_config::Config;
use scout_dataset::{Dataset, DatasetOptions};
use scout_domain::FieldTable;
use scout_providers::{
	planner::{self, PlanRequest},
	summarizer::{self, SummaryRequest},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait PlannerProvider
where
	Self: Send + Sync,
{
	/// Returns the raw plan object. Normalization happens in the pipeline.
	fn plan<'a>(&'a self, cfg: &'a Config, request: PlanRequest<'a>) -> BoxFuture<'a, Result<Value>>;
}

pub trait SummaryProvider
where
	Self: Send + Sync,
{
	fn summarize<'a>(
		&'a self,
		cfg: &'a Config,
		request: SummaryRequest<'a>,
	) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub planner: Arc<dyn PlannerProvider>,
	pub summarizer: Arc<dyn SummaryProvider>,
}
impl Providers {
	pub fn new(planner: Arc<dyn PlannerProvider>, summarizer: Arc<dyn SummaryProvider>) -> Self {
		Self { planner, summarizer }
	}

	/// Keeps the configured summarizer and swaps the planner.
	pub fn with_planner(mut self, planner: Arc<dyn PlannerProvider>) -> Self {
		self.planner = planner;

		self
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { planner: provider.clone(), summarizer: provider }
	}
}

/// Replays a fixed plan, for plan files and tests.
pub struct StaticPlanner {
	plan: Value,
}
impl StaticPlanner {
	pub fn new(plan: Value) -> Self {
		Self { plan }
	}
}
impl PlannerProvider for StaticPlanner {
	fn plan<'a>(&'a self, _cfg: &'a Config, _request: PlanRequest<'a>) -> BoxFuture<'a, Result<Value>> {
		let plan = self.plan.clone();

		Box::pin(async move { Ok(plan) })
	}
}

struct DefaultProviders;
impl PlannerProvider for DefaultProviders {
	fn plan<'a>(&'a self, cfg: &'a Config, request: PlanRequest<'a>) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			planner::plan(&cfg.providers.planner, &request, cfg.planner.max_attempts)
				.await
				.map_err(|err| Error::Planner { message: err.to_string() })
		})
	}
}
impl SummaryProvider for DefaultProviders {
	fn summarize<'a>(
		&'a self,
		cfg: &'a Config,
		request: SummaryRequest<'a>,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			let Some(provider) = cfg.providers.summarizer.as_ref() else {
				return Err(Error::Summarizer {
					message: "No summarizer provider is configured.".to_string(),
				});
			};

			summarizer::summarize(provider, &request)
				.await
				.map_err(|err| Error::Summarizer { message: err.to_string() })
		})
	}
}

pub struct ScoutService {
	pub cfg: Config,
	pub dataset: Dataset,
	pub table: FieldTable,
	pub providers: Providers,
}
impl ScoutService {
	pub fn new(cfg: Config, dataset: Dataset) -> Self {
		Self::with_providers(cfg, dataset, Providers::default())
	}

	pub fn with_providers(cfg: Config, dataset: Dataset, providers: Providers) -> Self {
		let table = FieldTable::from_config(&cfg.fields);

		Self { cfg, dataset, table, providers }
	}

	/// Loads the dataset from `data`, falling back to `dataset.path` in the config.
	pub fn open(cfg: Config, data: Option<&Path>, providers: Providers) -> Result<Self> {
		let path = data.or(cfg.dataset.path.as_deref()).ok_or_else(|| Error::InvalidRequest {
			message: "No dataset path given and dataset.path is not configured.".to_string(),
		})?;
		let dataset = scout_dataset::load(path, &DatasetOptions::from_config(&cfg))?;

		Ok(Self::with_providers(cfg, dataset, providers))
	}
}
