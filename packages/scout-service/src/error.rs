pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Planner error: {message}")]
	Planner { message: String },
	#[error("Summarizer error: {message}")]
	Summarizer { message: String },
	#[error(transparent)]
	Dataset(#[from] scout_dataset::Error),
}
