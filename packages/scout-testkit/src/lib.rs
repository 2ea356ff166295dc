mod error;

pub use error::{Error, Result};

use std::{
	collections::VecDeque,
	env, fs,
	future::IntoFuture,
	path::{Path, PathBuf},
	sync::{
		Arc, Mutex,
		atomic::{AtomicU64, Ordering},
	},
	time::{SystemTime, UNIX_EPOCH},
};

use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing,
};
use serde_json::{Map, Value};
use tokio::{
	net::TcpListener,
	sync::{oneshot, oneshot::Sender},
};

use scout_config::{
	Config, Dataset, Fields, LlmProviderConfig, Planner, Providers, Search, Service,
};
use scout_domain::Record;

pub const CHAT_PATH: &str = "/v1/chat/completions";

/// Header row plus five candidates in the loader's CSV layout.
pub const CANDIDATES_CSV: &str = "\
id,full_name,title,location,years_experience,skills,languages,desired_salary_usd,remote_experience_years,willing_to_relocate,open_to_contract,work_preference,last_active_date
5,Lisa Chen,React Developer,Cyprus,3,React; JavaScript; CSS,English,70000,1,true,0,Remote,2024-03-01
,Sara Ahmed,Data Engineer,Cyprus,6,Python;Spark,English;Arabic,90000,6,1,true,Remote,2024-01-15
12,Nikos Papadopoulos,Senior React Developer,Cyprus,7,React;TypeScript;Node.js,English;Greek,95000,4,false,1,Hybrid,2024-05-20
8,Anna Kowalski,Backend Developer,Germany,5,Python;Django;PostgreSQL,English;Polish,85000,2,yes,no,Onsite,2023-11-11
21,Marco Rossi,Frontend Developer,Italy,about 4,React;Vue.js,,not disclosed,,,,Remote,
";

static NEXT_TEMP_ID: AtomicU64 = AtomicU64::new(0);

/// The three-candidate fixture: #5 and #12 are React developers in Cyprus with 3 and 7
/// years, #8 is a Python developer in Germany with 5.
pub fn cyprus_candidates() -> Vec<Record> {
	records_from_json(serde_json::json!([
		{
			"id": 5,
			"name": "Lisa Chen",
			"title": "React Developer",
			"location": "Cyprus",
			"skills": ["React", "JavaScript", "CSS"],
			"experience": 3,
			"years_experience": 3,
		},
		{
			"id": 12,
			"name": "Nikos Papadopoulos",
			"title": "Senior React Developer",
			"location": "Cyprus",
			"skills": ["React", "TypeScript", "Node.js"],
			"experience": 7,
			"years_experience": 7,
		},
		{
			"id": 8,
			"name": "Anna Kowalski",
			"title": "Backend Developer",
			"location": "Germany",
			"skills": ["Python", "Django", "PostgreSQL"],
			"experience": 5,
			"years_experience": 5,
		},
	]))
}

/// A mixed-encoding pool: stringly numbers, string and native booleans, missing fields.
pub fn talent_pool() -> Vec<Record> {
	records_from_json(serde_json::json!([
		{ "id": 1, "name": "Ada", "location": "Berlin, Germany", "skills": "Rust,Go", "years_experience": "9", "desired_salary_usd": "150000", "willing_to_relocate": "true", "work_preference": "Remote" },
		{ "id": 2, "name": "Ben", "location": "Limassol, Cyprus", "skills": ["React", "CSS"], "years_experience": 4, "desired_salary_usd": 90000, "willing_to_relocate": false, "work_preference": "Hybrid" },
		{ "id": 3, "name": "Cleo", "location": "Nicosia, Cyprus", "skills": "React,Node", "years_experience": "4", "desired_salary_usd": "n/a", "willing_to_relocate": "1", "work_preference": "remote" },
		{ "id": "x-4", "name": "Dev", "location": "Paris, France", "years_experience": "", "willing_to_relocate": "no" },
		{ "id": 5, "name": "Eve", "location": "Athens, Greece", "skills": ["Python"], "years_experience": 12, "desired_salary_usd": 120000, "work_preference": "Onsite" },
		{ "id": 6, "name": "Finn", "location": "Limassol, Cyprus", "skills": "Rust", "years_experience": 4, "desired_salary_usd": 95000, "willing_to_relocate": true, "work_preference": "Remote" },
	]))
}

pub fn records_from_json(value: Value) -> Vec<Record> {
	serde_json::from_value(value).expect("Fixture records must parse.")
}

pub fn llm_provider(api_base: &str) -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "stub".to_string(),
		api_base: api_base.to_string(),
		api_key: "test-key".to_string(),
		path: CHAT_PATH.to_string(),
		model: "stub-model".to_string(),
		temperature: 0.1,
		timeout_ms: 5_000,
		default_headers: Map::new(),
	}
}

pub fn sample_config(api_base: &str) -> Config {
	Config {
		service: Service { log_level: "info".to_string() },
		dataset: Dataset { path: None, multi_value_delimiter: ";".to_string() },
		providers: Providers {
			planner: llm_provider(api_base),
			summarizer: Some(llm_provider(api_base)),
		},
		planner: Planner {
			default_rank_primary: "years_experience".to_string(),
			max_attempts: 3,
			sample_records: 50,
		},
		search: Search { default_limit: 20, summary_top_k: 5 },
		fields: Fields::default(),
	}
}

/// A uniquely named file under the system temp dir, removed on drop.
pub struct TempFile {
	path: PathBuf,
}
impl TempFile {
	pub fn new(suffix: &str, contents: &str) -> Result<Self> {
		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(|err| Error::Message(format!("System clock is before UNIX epoch: {err}.")))?
			.as_nanos();
		let id = NEXT_TEMP_ID.fetch_add(1, Ordering::Relaxed);
		let path = env::temp_dir().join(format!("scout_test_{nanos}_{id}{suffix}"));

		fs::write(&path, contents)?;

		Ok(Self { path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl Drop for TempFile {
	fn drop(&mut self) {
		let _ = fs::remove_file(&self.path);
	}
}

#[derive(Clone, Debug)]
pub enum ChatReply {
	Content(String),
	Status(u16),
}

struct StubState {
	replies: Mutex<VecDeque<ChatReply>>,
	requests: Mutex<Vec<Value>>,
}

/// An OpenAI-compatible chat completions endpoint that plays back canned replies in order.
/// The last reply repeats once the queue is exhausted.
pub struct ChatStub {
	base_url: String,
	state: Arc<StubState>,
	shutdown: Option<Sender<()>>,
}
impl ChatStub {
	pub async fn start(replies: Vec<ChatReply>) -> Result<Self> {
		let state = Arc::new(StubState {
			replies: Mutex::new(replies.into_iter().collect()),
			requests: Mutex::new(Vec::new()),
		});
		let app = Router::new().route(CHAT_PATH, routing::post(chat_handler)).with_state(state.clone());
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let (tx, rx) = oneshot::channel();
		let server = axum::serve(listener, app).with_graceful_shutdown(async move {
			let _ = rx.await;
		});

		tokio::spawn(async move {
			let _ = server.into_future().await;
		});

		Ok(Self { base_url: format!("http://{addr}"), state, shutdown: Some(tx) })
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Request bodies received so far.
	pub fn requests(&self) -> Vec<Value> {
		self.state.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl Drop for ChatStub {
	fn drop(&mut self) {
		if let Some(tx) = self.shutdown.take() {
			let _ = tx.send(());
		}
	}
}

async fn chat_handler(State(state): State<Arc<StubState>>, Json(payload): Json<Value>) -> Response {
	state.requests.lock().unwrap_or_else(|err| err.into_inner()).push(payload);

	let reply = {
		let mut replies = state.replies.lock().unwrap_or_else(|err| err.into_inner());

		if replies.len() > 1 { replies.pop_front() } else { replies.front().cloned() }
	};

	match reply {
		Some(ChatReply::Content(content)) => (
			StatusCode::OK,
			Json(serde_json::json!({
				"choices": [
					{ "message": { "role": "assistant", "content": content } }
				]
			})),
		)
			.into_response(),
		Some(ChatReply::Status(code)) =>
			StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR).into_response(),
		None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
	}
}
