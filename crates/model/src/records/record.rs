use crate::pagination::position::Position;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::{collections::BTreeMap, fmt};

/// Field name to value. `BTreeMap` keeps keys in ascending byte order,
/// which fixes the column order used when a record becomes a row.
pub type StructuredData = BTreeMap<String, Value>;

pub const META_SPREADSHEET_ID: &str = "sheets.spreadsheetId";
pub const META_SHEET_ID: &str = "sheets.sheetId";
pub const META_READ_AT: &str = "sheets.readAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// Record payload: either already structured, or raw JSON bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Structured(StructuredData),
    Raw(Vec<u8>),
}

impl Data {
    /// Objects become structured data; every other JSON value is kept raw.
    pub fn from_json(value: Value) -> Data {
        match value {
            Value::Object(map) => Data::Structured(map.into_iter().collect()),
            other => Data::Raw(other.to_string().into_bytes()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Data::Structured(map) => map.is_empty(),
            Data::Raw(bytes) => bytes.is_empty(),
        }
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Data::Structured(map) => map.serialize(serializer),
            Data::Raw(bytes) => match serde_json::from_slice::<Value>(bytes) {
                Ok(value) => value.serialize(serializer),
                Err(_) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
            },
        }
    }
}

/// A single change handed to (or received from) the host pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub operation: Operation,
    pub position: Position,
    pub key: Option<Data>,
    pub payload: Option<Data>,
    pub metadata: BTreeMap<String, String>,
}

impl ChangeRecord {
    pub fn create(position: Position, key: Option<Data>, payload: Data) -> Self {
        ChangeRecord {
            operation: Operation::Create,
            position,
            key,
            payload: Some(payload),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn with_read_at(self, at: DateTime<Utc>) -> Self {
        self.with_metadata(META_READ_AT, at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn is_create(&self) -> bool {
        self.operation == Operation::Create
    }
}
