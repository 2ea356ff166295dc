use clap::Parser;

use scout::{Args, BrowseArgs, Command, output};
use scout_domain::{
	RecordId,
	quick::{ExperienceLevel, SortBy},
	record_ids,
};
use scout_testkit::{CANDIDATES_CSV, TempFile};

const CYPRUS_PLAN: &str = r#"{
	"filter": {
		"include": [
			{ "field": "skills", "operator": "contains", "value": "React" },
			{ "field": "location", "operator": "contains", "value": "Cyprus" }
		]
	},
	"rank": { "primary": "experience" }
}"#;

fn parse(argv: &[&str]) -> Args {
	Args::try_parse_from(argv).expect("Arguments must parse.")
}

#[test]
fn parses_search_arguments() {
	let args = parse(&[
		"scout", "search", "-c", "scout.toml", "--plan", "plan.json", "--limit", "3", "--summarize",
		"react", "in", "cyprus",
	]);
	let Command::Search(search) = args.command else {
		panic!("Expected the search subcommand.");
	};

	assert_eq!(search.query.join(" "), "react in cyprus");
	assert_eq!(search.limit, Some(3));
	assert!(search.summarize);
	assert!(!search.json);
	assert!(search.plan.is_some());
}

#[test]
fn parses_browse_arguments() {
	let args = parse(&["scout", "browse", "-c", "scout.toml", "--level", "Senior", "--sort", "salary"]);
	let Command::Browse(browse) = args.command else {
		panic!("Expected the browse subcommand.");
	};

	assert_eq!(browse.level, Some(ExperienceLevel::Senior));
	assert_eq!(browse.sort, SortBy::Salary);
	assert!(Args::try_parse_from(["scout", "browse", "-c", "x", "--level", "lead"]).is_err());
	assert!(Args::try_parse_from(["scout", "search", "-c", "x"]).is_err());
}

#[test]
fn browse_filters_sorts_and_limits() {
	let pool = scout_testkit::cyprus_candidates();
	let args = BrowseArgs {
		dataset: scout::DatasetArgs { config: "unused.toml".into(), data: None },
		term: Some("react".to_string()),
		location: Some("cyprus".to_string()),
		level: None,
		sort: SortBy::Experience,
		limit: Some(1),
	};

	assert_eq!(record_ids(scout::browse(&pool, &args)), vec![RecordId::Int(12)]);
}

#[test]
fn renders_candidate_tables() {
	let pool = scout_testkit::cyprus_candidates();
	let records: Vec<_> = pool.iter().collect();
	let rendered = output::render_candidates(&records);
	let lines: Vec<&str> = rendered.lines().collect();

	assert!(lines[0].starts_with("ID"));
	assert!(lines[0].contains("SKILLS"));
	assert_eq!(lines.len(), 5);
	assert!(lines[3].contains("Nikos Papadopoulos"));
	assert_eq!(output::render_candidates(&[]), "No candidates matched.\n");
}

#[tokio::test]
async fn search_applies_a_plan_file() {
	let csv = TempFile::new(".csv", CANDIDATES_CSV).expect("Failed to write CSV.");
	let plan = TempFile::new(".json", CYPRUS_PLAN).expect("Failed to write plan.");
	let csv_path = csv.path().to_string_lossy().to_string();
	let plan_path = plan.path().to_string_lossy().to_string();
	let args = parse(&[
		"scout", "search", "-c", "unused.toml", "--data", &csv_path, "--plan", &plan_path, "react",
	]);
	let Command::Search(search) = args.command else {
		panic!("Expected the search subcommand.");
	};
	let config = scout_testkit::sample_config("http://127.0.0.1:9");
	let response = scout::search(config, &search).await.expect("Search failed.");

	assert_eq!(record_ids(&response.candidates), vec![RecordId::Int(12), RecordId::Int(5)]);

	let rendered = output::render_search(&response);

	assert!(rendered.starts_with("2 of 5 candidates matched \"react\"."));
	assert!(rendered.contains("Top skills: React (2)"));
}
