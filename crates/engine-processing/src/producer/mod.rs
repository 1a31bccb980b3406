use crate::error::ProducerError;
use async_trait::async_trait;
use model::records::record::ChangeRecord;
use tokio_util::sync::CancellationToken;

pub mod iterator;

/// Pull-based stream of change records.
#[async_trait]
pub trait RecordIterator: Send {
    /// Non-blocking. False only once the iterator has been stopped.
    fn has_next(&self) -> bool;

    /// Returns the next record, waiting for new rows if none are buffered.
    /// Never succeeds without a record.
    async fn next(&mut self, cancel: &CancellationToken) -> Result<ChangeRecord, ProducerError>;

    /// Stops the iterator and releases its reader. Idempotent.
    fn stop(&mut self);
}
