use connectors::{error::SheetsError, sheets::reader::RowRange};
use engine_core::error::Cancelled;
use model::error::{PositionError, TranscodeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("Invalid position: {0}")]
    Position(#[from] PositionError),

    #[error(
        "Position belongs to spreadsheet '{found_spreadsheet}' sheet {found_sheet}, \
         configured is '{spreadsheet_id}' sheet {sheet_id}"
    )]
    PositionMismatch {
        spreadsheet_id: String,
        sheet_id: i64,
        found_spreadsheet: String,
        found_sheet: i64,
    },

    #[error("Fetch failed for rows {}..{}: {source}", range.start, range.start + range.len)]
    Fetch {
        range: RowRange,
        #[source]
        source: SheetsError,
    },

    #[error("Iterator stopped")]
    Cancelled,
}

impl ProducerError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProducerError::Cancelled)
    }
}

impl From<Cancelled> for ProducerError {
    fn from(_: Cancelled) -> Self {
        ProducerError::Cancelled
    }
}

#[derive(Error, Debug)]
pub enum ConsumerError {
    #[error("Failed to transcode record {index}: {source}")]
    Transcode {
        index: usize,
        #[source]
        source: TranscodeError,
    },

    #[error("Rate limit exceeded after {attempts} retries: {source}")]
    RateLimitExceeded {
        attempts: u64,
        #[source]
        source: SheetsError,
    },

    #[error("Failed to append rows to sheet '{sheet}': {source}")]
    Append {
        sheet: String,
        #[source]
        source: SheetsError,
    },

    #[error("Write cancelled")]
    Cancelled,
}

impl ConsumerError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConsumerError::Cancelled)
    }
}

impl From<Cancelled> for ConsumerError {
    fn from(_: Cancelled) -> Self {
        ConsumerError::Cancelled
    }
}
