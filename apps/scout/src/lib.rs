pub mod output;

use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use clap::{Parser, Subcommand};
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

use scout_config::Config;
use scout_domain::{
	Record,
	quick::{self, ExperienceLevel, SortBy},
};
use scout_service::{Providers, ScoutService, SearchRequest, SearchResponse, StaticPlanner};

#[derive(Debug, Parser)]
#[command(
	version = scout_cli::VERSION,
	rename_all = "kebab",
	styles = scout_cli::styles(),
)]
pub struct Args {
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Plan with the configured LLM, then filter, rank and summarize.
	Search(SearchArgs),
	/// Keyword, location and experience-band browsing without a planner.
	Browse(BrowseArgs),
	/// List the distinct candidate locations.
	Locations(DatasetArgs),
}

#[derive(Debug, clap::Args)]
pub struct DatasetArgs {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Overrides `dataset.path`.
	#[arg(long, short = 'd', value_name = "FILE")]
	pub data: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct SearchArgs {
	#[command(flatten)]
	pub dataset: DatasetArgs,
	/// Apply this plan JSON instead of calling the planner.
	#[arg(long, value_name = "FILE")]
	pub plan: Option<PathBuf>,
	#[arg(long, value_name = "N")]
	pub limit: Option<usize>,
	#[arg(long)]
	pub summarize: bool,
	#[arg(long)]
	pub json: bool,
	#[arg(value_name = "QUERY", required = true, num_args = 1..)]
	pub query: Vec<String>,
}

#[derive(Debug, clap::Args)]
pub struct BrowseArgs {
	#[command(flatten)]
	pub dataset: DatasetArgs,
	#[arg(long, value_name = "TEXT")]
	pub term: Option<String>,
	#[arg(long, value_name = "TEXT")]
	pub location: Option<String>,
	#[arg(long, value_name = "junior|mid|senior")]
	pub level: Option<ExperienceLevel>,
	#[arg(long, value_name = "name|experience|salary", default_value = "name")]
	pub sort: SortBy,
	#[arg(long, value_name = "N")]
	pub limit: Option<usize>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	match args.command {
		Command::Search(search_args) => {
			let config = load_config(&search_args.dataset.config)?;
			let response = search(config, &search_args).await?;

			if search_args.json {
				println!("{}", serde_json::to_string_pretty(&response)?);
			} else {
				print!("{}", output::render_search(&response));
			}
		},
		Command::Browse(browse_args) => {
			let config = load_config(&browse_args.dataset.config)?;
			let service = open(config, &browse_args.dataset, Providers::default())?;
			let records = browse(service.dataset.records(), &browse_args);

			print!("{}", output::render_candidates(&records));
		},
		Command::Locations(dataset_args) => {
			let config = load_config(&dataset_args.config)?;
			let service = open(config, &dataset_args, Providers::default())?;

			for location in quick::unique_locations(service.dataset.records()) {
				println!("{location}");
			}
		},
	}

	Ok(())
}

/// Runs the search pipeline. A `--plan` file replaces the configured planner.
pub async fn search(config: Config, args: &SearchArgs) -> color_eyre::Result<SearchResponse> {
	let mut providers = Providers::default();

	if let Some(path) = &args.plan {
		providers = providers.with_planner(Arc::new(StaticPlanner::new(read_plan(path)?)));
	}

	let service = open(config, &args.dataset, providers)?;
	let request =
		SearchRequest { query: args.query.join(" "), limit: args.limit, summarize: args.summarize };

	Ok(service.search(request).await?)
}

pub fn browse<'a>(records: &'a [Record], args: &BrowseArgs) -> Vec<&'a Record> {
	let mut selected: Vec<&Record> = records.iter().collect();

	if let Some(term) = &args.term {
		selected = quick::filter_by_term(selected, term);
	}
	if let Some(location) = &args.location {
		selected = quick::filter_by_location(selected, location);
	}
	if let Some(level) = args.level {
		selected = quick::filter_by_level(selected, level);
	}

	let mut selected = quick::sort_records(selected, args.sort);

	if let Some(limit) = args.limit {
		selected.truncate(limit);
	}

	selected
}

fn load_config(path: &Path) -> color_eyre::Result<Config> {
	let config = scout_config::load(path)?;

	init_tracing(&config)?;

	Ok(config)
}

fn open(config: Config, args: &DatasetArgs, providers: Providers) -> color_eyre::Result<ScoutService> {
	Ok(ScoutService::open(config, args.data.as_deref(), providers)?)
}

fn read_plan(path: &Path) -> color_eyre::Result<serde_json::Value> {
	let raw = fs::read_to_string(path)
		.map_err(|err| eyre::eyre!("Failed to read plan file {}: {err}.", path.display()))?;

	Ok(serde_json::from_str(&raw)?)
}

fn init_tracing(config: &Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}
