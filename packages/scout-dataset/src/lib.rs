//! Candidate datasets loaded from CSV, coerced through the field classification table.

mod error;

pub use error::{Error, Result};

use std::{fs::File, io::Read, path::Path};

use ahash::AHashSet;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::{Map, Value};

use scout_domain::{
	FieldKind, FieldTable, Record, RecordId,
	record::ID_FIELD,
};

/// `(alias, source)`: the alias is filled from the source column when the row lacks it.
const FIELD_ALIASES: [(&str, &str); 3] =
	[("experience", "years_experience"), ("salary", "desired_salary_usd"), ("name", "full_name")];

#[derive(Debug, Clone)]
pub struct DatasetOptions {
	pub multi_value_delimiter: String,
	pub table: FieldTable,
}
impl DatasetOptions {
	pub fn from_config(cfg: &scout_config::Config) -> Self {
		Self {
			multi_value_delimiter: cfg.dataset.multi_value_delimiter.clone(),
			table: FieldTable::from_config(&cfg.fields),
		}
	}
}
impl Default for DatasetOptions {
	fn default() -> Self {
		Self { multi_value_delimiter: ";".to_string(), table: FieldTable::builtin() }
	}
}

/// An immutable, id-unique record set. Reloading replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
	records: Vec<Record>,
	field_names: Vec<String>,
}
impl Dataset {
	pub fn new(records: Vec<Record>) -> Result<Self> {
		let mut seen = AHashSet::with_capacity(records.len());
		let mut field_names: Vec<String> = Vec::new();
		let mut known_fields = AHashSet::new();

		for record in &records {
			if !seen.insert(record.id().clone()) {
				return Err(Error::DuplicateId { id: record.id().to_string() });
			}

			for name in record.fields().keys() {
				if known_fields.insert(name.clone()) {
					field_names.push(name.clone());
				}
			}
		}

		Ok(Self { records, field_names })
	}

	pub fn records(&self) -> &[Record] {
		&self.records
	}

	/// Union of field names in first-seen order.
	pub fn field_names(&self) -> &[String] {
		&self.field_names
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

pub fn load(path: &Path, options: &DatasetOptions) -> Result<Dataset> {
	let file = File::open(path).map_err(|err| Error::Io { path: path.to_path_buf(), source: err })?;
	let dataset = from_reader(file, options)?;

	tracing::info!(
		path = %path.display(),
		records = dataset.len(),
		fields = dataset.field_names().len(),
		"Dataset loaded."
	);

	Ok(dataset)
}

pub fn from_reader<R>(reader: R, options: &DatasetOptions) -> Result<Dataset>
where
	R: Read,
{
	let mut reader =
		ReaderBuilder::new().has_headers(true).flexible(true).trim(Trim::All).from_reader(reader);
	let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

	if headers.iter().all(|header| header.is_empty()) {
		return Err(Error::MissingHeader);
	}

	let mut records = Vec::new();

	for (index, row) in reader.records().enumerate() {
		records.push(transform_row(&headers, &row?, index, options));
	}

	Dataset::new(records)
}

/// Accepts a JSON array of objects. Aliases and id fallback apply; values are kept as-is.
pub fn from_json(value: Value) -> Result<Dataset> {
	let Value::Array(items) = value else {
		return Err(Error::InvalidJson { message: "Dataset JSON must be an array.".to_string() });
	};
	let mut records = Vec::with_capacity(items.len());

	for (index, item) in items.into_iter().enumerate() {
		let Value::Object(mut fields) = item else {
			return Err(Error::InvalidJson {
				message: format!("Dataset entry {index} must be an object."),
			});
		};

		apply_aliases(&mut fields);

		records.push(finish_record(fields, index));
	}

	Dataset::new(records)
}

fn transform_row(
	headers: &[String],
	row: &StringRecord,
	index: usize,
	options: &DatasetOptions,
) -> Record {
	let mut fields = Map::new();

	for (header, cell) in headers.iter().zip(row.iter()) {
		if header.is_empty() || cell.is_empty() {
			continue;
		}

		let value = if header == ID_FIELD {
			Value::String(cell.to_string())
		} else {
			coerce_cell(cell, options.table.kind(header), &options.multi_value_delimiter)
		};

		fields.insert(header.clone(), value);
	}

	apply_aliases(&mut fields);

	finish_record(fields, index)
}

fn coerce_cell(cell: &str, kind: FieldKind, delimiter: &str) -> Value {
	match kind {
		FieldKind::Numeric => parse_full_number(cell).unwrap_or_else(|| Value::String(cell.to_string())),
		FieldKind::Boolean => match cell.to_ascii_lowercase().as_str() {
			"true" | "1" => Value::Bool(true),
			"false" | "0" => Value::Bool(false),
			_ => Value::String(cell.to_string()),
		},
		FieldKind::MultiValue => Value::Array(
			cell.split(delimiter)
				.map(str::trim)
				.filter(|item| !item.is_empty())
				.map(|item| Value::String(item.to_string()))
				.collect(),
		),
		FieldKind::Text | FieldKind::Date => Value::String(cell.to_string()),
	}
}

fn parse_full_number(cell: &str) -> Option<Value> {
	if let Ok(int) = cell.parse::<i64>() {
		return Some(Value::from(int));
	}

	let float = cell.parse::<f64>().ok().filter(|float| float.is_finite())?;

	serde_json::Number::from_f64(float).map(Value::Number)
}

fn apply_aliases(fields: &mut Map<String, Value>) {
	for (alias, source) in FIELD_ALIASES {
		if fields.contains_key(alias) {
			continue;
		}
		if let Some(value) = fields.get(source).cloned() {
			fields.insert(alias.to_string(), value);
		}
	}
}

/// Rows without a usable id take their 1-based position.
fn finish_record(fields: Map<String, Value>, index: usize) -> Record {
	match fields.get(ID_FIELD).and_then(RecordId::from_value) {
		Some(id) => Record::with_id(id, fields),
		None => Record::with_id(RecordId::Int(index as i64 + 1), fields),
	}
}
