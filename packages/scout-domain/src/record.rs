use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub const ID_FIELD: &str = "id";

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
	#[error("Record is missing a usable id.")]
	MissingId,
}

/// Stable record identity. Numeric-looking text ids are stored as integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
	Int(i64),
	Text(String),
}
impl RecordId {
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Number(number) => {
				if let Some(int) = number.as_i64() {
					return Some(Self::Int(int));
				}

				let float = number.as_f64()?;

				if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
					Some(Self::Int(float as i64))
				} else {
					Some(Self::Text(number.to_string()))
				}
			},
			Value::String(raw) => {
				let trimmed = raw.trim();

				if trimmed.is_empty() {
					return None;
				}

				Some(trimmed.parse::<i64>().map(Self::Int).unwrap_or_else(|_| Self::Text(trimmed.to_string())))
			},
			_ => None,
		}
	}

	pub fn to_value(&self) -> Value {
		match self {
			Self::Int(int) => Value::from(*int),
			Self::Text(text) => Value::String(text.clone()),
		}
	}
}
impl Display for RecordId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Int(int) => write!(f, "{int}"),
			Self::Text(text) => f.write_str(text),
		}
	}
}
impl From<i64> for RecordId {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}
impl From<&str> for RecordId {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

/// One candidate. Fields are schema-less; only `id` is guaranteed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Record {
	id: RecordId,
	fields: Map<String, Value>,
}
impl Record {
	pub fn new(fields: Map<String, Value>) -> Result<Self, RecordError> {
		let id =
			fields.get(ID_FIELD).and_then(RecordId::from_value).ok_or(RecordError::MissingId)?;

		Ok(Self { id, fields })
	}

	pub fn with_id(id: RecordId, mut fields: Map<String, Value>) -> Self {
		fields.insert(ID_FIELD.to_string(), id.to_value());

		Self { id, fields }
	}

	pub fn id(&self) -> &RecordId {
		&self.id
	}

	/// Returns the field value, treating JSON null as absent.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.fields.get(field).filter(|value| !value.is_null())
	}

	pub fn fields(&self) -> &Map<String, Value> {
		&self.fields
	}
}
impl TryFrom<Map<String, Value>> for Record {
	type Error = RecordError;

	fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
		Self::new(fields)
	}
}
impl Serialize for Record {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.fields.serialize(serializer)
	}
}

pub fn record_ids<'a, I>(records: I) -> Vec<RecordId>
where
	I: IntoIterator<Item = &'a Record>,
{
	records.into_iter().map(|record| record.id().clone()).collect()
}
