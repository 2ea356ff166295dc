pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read dataset at {path:?}.")]
	Io { path: std::path::PathBuf, source: std::io::Error },
	#[error(transparent)]
	Csv(#[from] csv::Error),
	#[error("Dataset has no header row.")]
	MissingHeader,
	#[error("Duplicate candidate id {id}.")]
	DuplicateId { id: String },
	#[error("{message}")]
	InvalidJson { message: String },
}
