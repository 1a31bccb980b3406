use crate::{error::ProducerError, producer::RecordIterator};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use connectors::sheets::reader::{RowRange, RowSource, RowWindow};
use engine_core::wait::sleep_or_cancel_either;
use model::{
    pagination::position::{Cursor, Position},
    records::{
        record::{ChangeRecord, Data, META_SHEET_ID, META_SPREADSHEET_ID, StructuredData},
        row::Row,
        transcode::record_from_row,
    },
};
use serde_json::Value;
use std::{collections::VecDeque, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Key of the structured record key; holds the 1-based sheet row number.
pub const ROW_KEY: &str = "row";

#[derive(Debug, Clone, PartialEq)]
pub struct IteratorConfig {
    pub spreadsheet_id: String,
    pub sheet_id: i64,
    pub polling_period: Duration,
    pub batch_size: usize,
    pub header_row: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorState {
    /// Created, nothing fetched yet.
    Idle,
    /// A fetch is in flight.
    Polling,
    /// The last poll queued records that have not been handed out yet.
    Buffered,
    /// Handing out queued records; the queue may be empty.
    Draining,
    Stopped,
}

/// Polls one sheet for appended rows and hands them out as `create` records.
///
/// Every poll fetches a window starting at the cursor offset. Rows whose index
/// is below the offset were already emitted and are dropped, so overlapping
/// windows never produce duplicates.
pub struct SheetsIterator<R: RowSource> {
    config: IteratorConfig,
    reader: Option<R>,
    cursor: Cursor,
    headers: Option<Vec<String>>,
    buffer: VecDeque<ChangeRecord>,
    state: IteratorState,
    stop_token: CancellationToken,
}

impl<R: RowSource> SheetsIterator<R> {
    /// Resumes from `position` and performs the first fetch right away.
    pub async fn open(
        reader: R,
        config: IteratorConfig,
        position: Option<&Position>,
    ) -> Result<Self, ProducerError> {
        let decoded = Cursor::decode(position)?;
        if !decoded.belongs_to(&config.spreadsheet_id, config.sheet_id) {
            return Err(ProducerError::PositionMismatch {
                spreadsheet_id: config.spreadsheet_id.clone(),
                sheet_id: config.sheet_id,
                found_spreadsheet: decoded.spreadsheet_id,
                found_sheet: decoded.sheet_id,
            });
        }

        let mut row_offset = decoded.row_offset;
        if config.header_row {
            row_offset = row_offset.max(1);
        }

        let mut iterator = SheetsIterator {
            cursor: Cursor::new(row_offset, config.spreadsheet_id.clone(), config.sheet_id),
            config,
            reader: Some(reader),
            headers: None,
            buffer: VecDeque::new(),
            state: IteratorState::Idle,
            stop_token: CancellationToken::new(),
        };

        info!(
            spreadsheet_id = %iterator.config.spreadsheet_id,
            sheet_id = iterator.config.sheet_id,
            row_offset,
            "Opening sheet iterator."
        );
        iterator.poll().await?;
        Ok(iterator)
    }

    /// A token that stops the iterator when cancelled, usable from other tasks.
    pub fn stop_handle(&self) -> CancellationToken {
        self.stop_token.clone()
    }

    pub fn state(&self) -> IteratorState {
        self.state
    }

    /// Cursor after the last queued row.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    fn is_stopped(&self) -> bool {
        self.state == IteratorState::Stopped || self.stop_token.is_cancelled()
    }

    async fn poll(&mut self) -> Result<(), ProducerError> {
        self.state = IteratorState::Polling;

        if self.config.header_row && self.headers.is_none() {
            self.load_headers().await?;
        }

        let start = u64::try_from(self.cursor.row_offset).unwrap_or_default();
        let range = RowRange::new(start, self.config.batch_size as u64);
        let window = self.fetch(range).await?;

        let queued = self.enqueue(window, Utc::now());
        debug!(row_offset = self.cursor.row_offset, queued, "Polled sheet.");

        self.state = if self.buffer.is_empty() {
            IteratorState::Draining
        } else {
            IteratorState::Buffered
        };
        Ok(())
    }

    async fn load_headers(&mut self) -> Result<(), ProducerError> {
        let window = self.fetch(RowRange::new(0, 1)).await?;
        if window.start != 0 {
            return Ok(());
        }

        if let Some(row) = window.rows.first().filter(|row| !row.is_blank()) {
            let headers = row.as_headers();
            info!(columns = headers.len(), "Loaded header row.");
            self.headers = Some(headers);
        }
        Ok(())
    }

    async fn fetch(&mut self, range: RowRange) -> Result<RowWindow, ProducerError> {
        let reader = self.reader.as_mut().ok_or(ProducerError::Cancelled)?;
        reader
            .fetch(range)
            .await
            .map_err(|source| ProducerError::Fetch { range, source })
    }

    /// Queues the rows of `window` that lie at or after the cursor and
    /// advances the cursor past them. Returns the number of queued records.
    fn enqueue(&mut self, window: RowWindow, read_at: DateTime<Utc>) -> usize {
        let mut queued = 0;

        for (index, row) in (window.start..).zip(window.rows) {
            let index = i64::try_from(index).unwrap_or(i64::MAX);
            if index < self.cursor.row_offset {
                continue;
            }

            let next = self.cursor.advance_to(index + 1);
            let record = self.to_record(&row, index, &next, read_at);
            self.buffer.push_back(record);
            self.cursor = next;
            queued += 1;
        }

        queued
    }

    fn to_record(
        &self,
        row: &Row,
        index: i64,
        next: &Cursor,
        read_at: DateTime<Utc>,
    ) -> ChangeRecord {
        let key = StructuredData::from([(ROW_KEY.to_string(), Value::from(index + 1))]);
        let payload = record_from_row(row, self.headers.as_deref());

        ChangeRecord::create(
            next.encode(),
            Some(Data::Structured(key)),
            Data::Structured(payload),
        )
        .with_metadata(META_SPREADSHEET_ID, self.config.spreadsheet_id.as_str())
        .with_metadata(META_SHEET_ID, self.config.sheet_id.to_string())
        .with_read_at(read_at)
    }
}

#[async_trait]
impl<R: RowSource> RecordIterator for SheetsIterator<R> {
    fn has_next(&self) -> bool {
        !self.is_stopped()
    }

    async fn next(&mut self, cancel: &CancellationToken) -> Result<ChangeRecord, ProducerError> {
        loop {
            if self.is_stopped() {
                self.stop();
                return Err(ProducerError::Cancelled);
            }

            if let Some(record) = self.buffer.pop_front() {
                self.state = IteratorState::Draining;
                return Ok(record);
            }

            if let Err(e) =
                sleep_or_cancel_either(self.config.polling_period, cancel, &self.stop_token).await
            {
                if self.stop_token.is_cancelled() {
                    self.stop();
                }
                return Err(e.into());
            }

            if let Err(e) = self.poll().await {
                self.state = IteratorState::Draining;
                return Err(e);
            }
        }
    }

    fn stop(&mut self) {
        if self.state == IteratorState::Stopped {
            return;
        }

        self.stop_token.cancel();
        self.reader = None;
        self.buffer.clear();
        self.state = IteratorState::Stopped;
        info!(row_offset = self.cursor.row_offset, "Sheet iterator stopped.");
    }
}
