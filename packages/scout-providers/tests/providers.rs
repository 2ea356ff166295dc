use reqwest::header::AUTHORIZATION;
use serde_json::Map;

use scout_providers::{
	Error,
	planner::{self, PlanRequest},
	summarizer::{self, SummaryRequest},
};
use scout_testkit::{ChatReply, ChatStub};

const PLAN_REPLY: &str = r#"Here is your plan:
{"filter":{"include":[{"field":"skills","operator":"contains","value":"React"}]},"rank":{"primary":"years_experience"}}"#;

fn fields() -> Vec<String> {
	vec!["id".to_string(), "skills".to_string(), "years_experience".to_string()]
}

#[test]
fn builds_bearer_auth_header() {
	let headers =
		scout_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[tokio::test]
async fn planner_round_trip_extracts_the_plan() {
	let stub = ChatStub::start(vec![ChatReply::Content(PLAN_REPLY.to_string())])
		.await
		.expect("Failed to start stub.");
	let cfg = scout_testkit::llm_provider(stub.base_url());
	let fields = fields();
	let candidates = scout_testkit::cyprus_candidates();
	let request =
		PlanRequest { query: "React devs", fields: &fields, records: &candidates, record_count: 3 };
	let plan = planner::plan(&cfg, &request, 3).await.expect("Planner call failed.");

	assert_eq!(plan["rank"]["primary"], "years_experience");
	assert_eq!(plan["filter"]["include"][0]["value"], "React");

	let requests = stub.requests();

	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0]["model"], "stub-model");
	assert_eq!(requests[0]["messages"].as_array().map(Vec::len), Some(2));

	let user = requests[0]["messages"][1]["content"].as_str().unwrap_or_default();

	assert!(user.contains("Nikos Papadopoulos"));
	assert!(user.contains("Candidates (3 of 3 shown)"));
}

#[tokio::test]
async fn planner_retries_unusable_replies() {
	let stub = ChatStub::start(vec![
		ChatReply::Content("I am not sure.".to_string()),
		ChatReply::Content(PLAN_REPLY.to_string()),
	])
	.await
	.expect("Failed to start stub.");
	let cfg = scout_testkit::llm_provider(stub.base_url());
	let fields = fields();
	let request = PlanRequest { query: "React devs", fields: &fields, records: &[], record_count: 3 };

	planner::plan(&cfg, &request, 3).await.expect("Second attempt must succeed.");

	assert_eq!(stub.requests().len(), 2);
}

#[tokio::test]
async fn planner_gives_up_after_max_attempts() {
	let stub = ChatStub::start(vec![ChatReply::Content("no plan here".to_string())])
		.await
		.expect("Failed to start stub.");
	let cfg = scout_testkit::llm_provider(stub.base_url());
	let fields = fields();
	let request = PlanRequest { query: "anything", fields: &fields, records: &[], record_count: 0 };
	let err = planner::plan(&cfg, &request, 2).await.expect_err("Planner must fail.");

	assert!(matches!(err, Error::InvalidResponse { .. }));
	assert_eq!(stub.requests().len(), 2);
}

#[tokio::test]
async fn planner_surfaces_http_errors() {
	let stub = ChatStub::start(vec![ChatReply::Status(500)]).await.expect("Failed to start stub.");
	let cfg = scout_testkit::llm_provider(stub.base_url());
	let fields = fields();
	let request = PlanRequest { query: "anything", fields: &fields, records: &[], record_count: 0 };
	let err = planner::plan(&cfg, &request, 3).await.expect_err("Planner must fail.");

	assert!(matches!(err, Error::Reqwest(_)));
	assert_eq!(stub.requests().len(), 1);
}

#[tokio::test]
async fn summarizer_returns_trimmed_text() {
	let stub = ChatStub::start(vec![ChatReply::Content("  Two strong React engineers.\n".to_string())])
		.await
		.expect("Failed to start stub.");
	let cfg = scout_testkit::llm_provider(stub.base_url());
	let candidates = scout_testkit::cyprus_candidates();
	let top: Vec<_> = candidates.iter().take(2).collect();
	let request =
		SummaryRequest { query: "React in Cyprus", top: &top, filtered_count: 2, total_count: 3 };
	let text = summarizer::summarize(&cfg, &request).await.expect("Summarizer call failed.");

	assert_eq!(text, "Two strong React engineers.");

	let requests = stub.requests();
	let prompt = requests[0]["messages"][1]["content"].as_str().unwrap_or_default();

	assert!(prompt.contains("1. Lisa Chen - React Developer"));
	assert!(prompt.contains("2. Nikos Papadopoulos"));
}

#[tokio::test]
async fn summarizer_rejects_empty_text() {
	let stub =
		ChatStub::start(vec![ChatReply::Content("   ".to_string())]).await.expect("Failed to start stub.");
	let cfg = scout_testkit::llm_provider(stub.base_url());
	let request = SummaryRequest { query: "x", top: &[], filtered_count: 0, total_count: 0 };

	assert!(matches!(
		summarizer::summarize(&cfg, &request).await,
		Err(Error::InvalidResponse { .. })
	));
}
