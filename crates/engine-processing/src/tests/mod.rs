
use async_trait::async_trait;
use connectors::{
    error::SheetsError,
    sheets::{
        appender::RowSink,
        reader::{RowRange, RowSource, RowWindow},
    },
};
use model::records::row::Row;
use serde_json::Value;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

pub(crate) fn row(cells: &[&str]) -> Row {
    Row::new(cells.iter().map(|c| Value::from(*c)).collect())
}

pub(crate) fn rate_limited() -> SheetsError {
    SheetsError::Api {
        status: 429,
        reason: Some("RESOURCE_EXHAUSTED".to_string()),
        message: "Quota exceeded for quota metric 'Write requests'".to_string(),
    }
}

pub(crate) fn server_error(status: u16) -> SheetsError {
    SheetsError::Api {
        status,
        reason: Some("INTERNAL".to_string()),
        message: "Internal error encountered.".to_string(),
    }
}

/// A sheet that grows while the test runs. Clones share the same rows.
#[derive(Clone, Default)]
pub(crate) struct FakeSheet {
    rows: Arc<Mutex<Vec<Row>>>,
    requests: Arc<Mutex<Vec<RowRange>>>,
}

impl FakeSheet {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        FakeSheet {
            rows: Arc::new(Mutex::new(rows)),
            ..Default::default()
        }
    }

    pub fn push(&self, row: Row) {
        self.rows.lock().unwrap().push(row);
    }

    pub fn requests(&self) -> Vec<RowRange> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RowSource for FakeSheet {
    async fn fetch(&mut self, range: RowRange) -> Result<RowWindow, SheetsError> {
        self.requests.lock().unwrap().push(range);

        let rows = self.rows.lock().unwrap();
        let start = (range.start as usize).min(rows.len());
        let end = ((range.start + range.len) as usize).min(rows.len());
        Ok(RowWindow {
            start: range.start,
            rows: rows[start..end].to_vec(),
        })
    }
}

/// Replays canned fetch results, then reports an empty window.
#[derive(Default)]
pub(crate) struct ScriptedSource {
    replies: VecDeque<Result<RowWindow, SheetsError>>,
}

impl ScriptedSource {
    pub fn new(replies: Vec<Result<RowWindow, SheetsError>>) -> Self {
        ScriptedSource {
            replies: replies.into(),
        }
    }
}

#[async_trait]
impl RowSource for ScriptedSource {
    async fn fetch(&mut self, range: RowRange) -> Result<RowWindow, SheetsError> {
        self.replies.pop_front().unwrap_or(Ok(RowWindow {
            start: range.start,
            rows: Vec::new(),
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Reply {
    Ok,
    RateLimited,
    Fail(u16),
}

/// Sink answering from a script, then with `fallback`. Records every attempt.
#[derive(Clone)]
pub(crate) struct FakeSink {
    script: Arc<Mutex<VecDeque<Reply>>>,
    fallback: Reply,
    attempts: Arc<Mutex<Vec<Vec<Row>>>>,
}

impl FakeSink {
    pub fn new(script: Vec<Reply>, fallback: Reply) -> Self {
        FakeSink {
            script: Arc::new(Mutex::new(script.into())),
            fallback,
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn always(reply: Reply) -> Self {
        Self::new(Vec::new(), reply)
    }

    pub fn attempts(&self) -> Vec<Vec<Row>> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl RowSink for FakeSink {
    async fn append(&mut self, rows: &[Row]) -> Result<(), SheetsError> {
        self.attempts.lock().unwrap().push(rows.to_vec());

        let reply = self.script.lock().unwrap().pop_front().unwrap_or(self.fallback);
        match reply {
            Reply::Ok => Ok(()),
            Reply::RateLimited => Err(rate_limited()),
            Reply::Fail(status) => Err(server_error(status)),
        }
    }
}
