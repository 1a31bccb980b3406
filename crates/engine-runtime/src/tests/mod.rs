mod source;

use async_trait::async_trait;
use connectors::{
    error::SheetsError,
    sheets::{
        appender::RowSink,
        reader::{RowRange, RowSource, RowWindow},
    },
};
use engine_core::settings::RawConfig;
use model::records::row::Row;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

pub(crate) const SHEETS_URL: &str =
    "https://docs.google.com/spreadsheets/d/1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms/edit#gid=3";

pub(crate) fn row(cells: &[&str]) -> Row {
    Row::new(cells.iter().map(|c| Value::from(*c)).collect())
}

/// Connector config pointing at a real (empty) credentials file.
pub(crate) fn base_config(file: &NamedTempFile) -> RawConfig {
    let path = file.path().display().to_string();
    RawConfig::from([
        ("credentialsFile".to_string(), path.clone()),
        ("tokensFile".to_string(), path),
        ("sheetsURL".to_string(), SHEETS_URL.to_string()),
    ])
}

/// Rows served from memory.
#[derive(Clone, Default)]
pub(crate) struct MemorySheet {
    rows: Arc<Mutex<Vec<Row>>>,
}

impl MemorySheet {
    pub fn new(rows: Vec<Row>) -> Self {
        MemorySheet {
            rows: Arc::new(Mutex::new(rows)),
        }
    }
}

#[async_trait]
impl RowSource for MemorySheet {
    async fn fetch(&mut self, range: RowRange) -> Result<RowWindow, SheetsError> {
        let rows = self.rows.lock().unwrap();
        let start = (range.start as usize).min(rows.len());
        let end = ((range.start + range.len) as usize).min(rows.len());
        Ok(RowWindow {
            start: range.start,
            rows: rows[start..end].to_vec(),
        })
    }
}

/// A [`MemorySheet`] whose next fetches can be made to fail.
#[derive(Clone, Default)]
pub(crate) struct FlakySheet {
    inner: MemorySheet,
    failures: Arc<Mutex<usize>>,
}

impl FlakySheet {
    pub fn new(rows: Vec<Row>) -> Self {
        FlakySheet {
            inner: MemorySheet::new(rows),
            failures: Arc::default(),
        }
    }

    pub fn fail_next(&self, fetches: usize) {
        *self.failures.lock().unwrap() = fetches;
    }

    pub fn push(&self, row: Row) {
        self.inner.rows.lock().unwrap().push(row);
    }
}

#[async_trait]
impl RowSource for FlakySheet {
    async fn fetch(&mut self, range: RowRange) -> Result<RowWindow, SheetsError> {
        {
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(SheetsError::from_response(503, "Service Unavailable"));
            }
        }
        self.inner.fetch(range).await
    }
}

/// Collects appended rows.
#[derive(Clone, Default)]
pub(crate) struct MemorySink {
    appended: Arc<Mutex<Vec<Row>>>,
    calls: Arc<Mutex<usize>>,
}

impl MemorySink {
    pub fn rows(&self) -> Vec<Row> {
        self.appended.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl RowSink for MemorySink {
    async fn append(&mut self, rows: &[Row]) -> Result<(), SheetsError> {
        *self.calls.lock().unwrap() += 1;
        self.appended.lock().unwrap().extend_from_slice(rows);
        Ok(())
    }
}
