mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Dataset, Fields, LlmProviderConfig, Planner, Providers, Search, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.dataset.multi_value_delimiter.is_empty() {
		return Err(Error::Validation {
			message: "dataset.multi_value_delimiter must be non-empty.".to_string(),
		});
	}
	if cfg.planner.default_rank_primary.trim().is_empty() {
		return Err(Error::Validation {
			message: "planner.default_rank_primary must be non-empty.".to_string(),
		});
	}
	if cfg.planner.max_attempts == 0 {
		return Err(Error::Validation {
			message: "planner.max_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_limit == 0 {
		return Err(Error::Validation {
			message: "search.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.summary_top_k == 0 {
		return Err(Error::Validation {
			message: "search.summary_top_k must be greater than zero.".to_string(),
		});
	}

	let mut providers = vec![("planner", &cfg.providers.planner)];

	if let Some(summarizer) = cfg.providers.summarizer.as_ref() {
		providers.push(("summarizer", summarizer));
	}

	for (label, provider) in providers {
		if provider.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
		if provider.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_base must be non-empty."),
			});
		}
		if provider.model.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} model must be non-empty."),
			});
		}
		if !provider.temperature.is_finite() || !(0.0..=2.0).contains(&provider.temperature) {
			return Err(Error::Validation {
				message: format!("Provider {label} temperature must be in the range 0.0-2.0."),
			});
		}
		if provider.timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("Provider {label} timeout_ms must be greater than zero."),
			});
		}
	}

	for (label, names) in [
		("fields.numeric", &cfg.fields.numeric),
		("fields.date", &cfg.fields.date),
		("fields.boolean", &cfg.fields.boolean),
		("fields.multi_value", &cfg.fields.multi_value),
	] {
		if names.iter().any(|name| name.trim().is_empty()) {
			return Err(Error::Validation {
				message: format!("{label} entries must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.dataset.path.as_deref().map(|path| path.as_os_str().is_empty()).unwrap_or(false) {
		cfg.dataset.path = None;
	}

	cfg.planner.default_rank_primary = cfg.planner.default_rank_primary.trim().to_string();

	for names in [
		&mut cfg.fields.numeric,
		&mut cfg.fields.date,
		&mut cfg.fields.boolean,
		&mut cfg.fields.multi_value,
	] {
		for name in names.iter_mut() {
			*name = name.trim().to_ascii_lowercase();
		}
	}
}
