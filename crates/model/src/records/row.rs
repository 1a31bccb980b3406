use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of a sheet: cells in column order. Width varies between rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub Vec<Value>);

impl Row {
    pub fn new(cells: Vec<Value>) -> Self {
        Row(cells)
    }

    pub fn cells(&self) -> &[Value] {
        &self.0
    }

    /// A row with no cells, or only empty-string / null cells.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|cell| match cell {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        })
    }

    /// Header names taken from this row's cells.
    pub fn as_headers(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|cell| match cell {
                Value::String(s) => s.trim().to_string(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect()
    }
}

impl From<Vec<Value>> for Row {
    fn from(cells: Vec<Value>) -> Self {
        Row(cells)
    }
}
