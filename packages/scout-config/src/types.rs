use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub dataset: Dataset,
	pub providers: Providers,
	pub planner: Planner,
	pub search: Search,
	#[serde(default)]
	pub fields: Fields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
	/// Optional. The CLI `--data` flag takes precedence.
	pub path: Option<PathBuf>,
	#[serde(default = "default_multi_value_delimiter")]
	pub multi_value_delimiter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub planner: LlmProviderConfig,
	/// Optional. Narrative summaries are disabled when absent.
	pub summarizer: Option<LlmProviderConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Planner {
	#[serde(default = "default_rank_primary")]
	pub default_rank_primary: String,
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	/// Records serialized into the planner prompt, in dataset order. `0` sends none.
	#[serde(default = "default_sample_records")]
	pub sample_records: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	pub default_limit: usize,
	#[serde(default = "default_summary_top_k")]
	pub summary_top_k: usize,
}

/// Extra entries for the field classification table. Built-in entries stay in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fields {
	#[serde(default)]
	pub numeric: Vec<String>,
	#[serde(default)]
	pub date: Vec<String>,
	#[serde(default)]
	pub boolean: Vec<String>,
	#[serde(default)]
	pub multi_value: Vec<String>,
}

fn default_multi_value_delimiter() -> String {
	";".to_string()
}

fn default_rank_primary() -> String {
	"years_experience".to_string()
}

fn default_max_attempts() -> u32 {
	3
}

fn default_sample_records() -> usize {
	50
}

fn default_summary_top_k() -> usize {
	5
}
