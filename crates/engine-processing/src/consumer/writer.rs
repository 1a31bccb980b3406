use crate::error::ConsumerError;
use connectors::sheets::appender::RowSink;
use engine_core::{
    retry::{RateLimitBudget, RetryDisposition},
    wait::sleep_or_cancel,
};
use model::records::{record::ChangeRecord, row::Row, transcode::row_from_record};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Delay unit for rate-limit backoff; the n-th consecutive retry waits n units.
pub const RATE_LIMIT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Appends batches of records to a sheet, retrying provider rate limiting.
pub struct RetryingWriter<S: RowSink> {
    sink: S,
    sheet_name: String,
    budget: RateLimitBudget,
}

impl<S: RowSink> RetryingWriter<S> {
    pub fn new(sink: S, sheet_name: impl Into<String>, max_retries: u64) -> Self {
        RetryingWriter {
            sink,
            sheet_name: sheet_name.into(),
            budget: RateLimitBudget::new(max_retries, RATE_LIMIT_BASE_DELAY),
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.budget = RateLimitBudget::new(self.budget.max_retries(), base_delay);
        self
    }

    /// Consecutive rate-limit rejections since the last successful append.
    pub fn retry_count(&self) -> u64 {
        self.budget.retry_count()
    }

    /// Writes the `create` records of `records` in a single append and
    /// returns the number of rows appended. Update and delete records are
    /// dropped. Nothing is sent if any record fails to transcode.
    pub async fn write(
        &mut self,
        records: &[ChangeRecord],
        cancel: &CancellationToken,
    ) -> Result<usize, ConsumerError> {
        let rows = records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.is_create())
            .map(|(index, record)| {
                row_from_record(record.payload.as_ref())
                    .map_err(|source| ConsumerError::Transcode { index, source })
            })
            .collect::<Result<Vec<Row>, _>>()?;

        let dropped = records.len() - rows.len();
        if dropped > 0 {
            debug!(dropped, "Skipping update and delete records.");
        }
        if rows.is_empty() {
            return Ok(0);
        }

        loop {
            match self.sink.append(&rows).await {
                Ok(()) => {
                    self.budget.record_success();
                    info!(sheet = %self.sheet_name, rows = rows.len(), "Appended batch.");
                    return Ok(rows.len());
                }
                Err(e) if e.is_rate_limited() => match self.budget.record_rate_limit() {
                    RetryDisposition::RetryAfter(delay) => {
                        warn!(
                            sheet = %self.sheet_name,
                            retry = self.budget.retry_count(),
                            max_retries = self.budget.max_retries(),
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Rate limited, retrying append."
                        );
                        sleep_or_cancel(delay, cancel).await?;
                    }
                    RetryDisposition::Exhausted { attempts } => {
                        return Err(ConsumerError::RateLimitExceeded {
                            attempts,
                            source: e,
                        });
                    }
                },
                Err(source) => {
                    return Err(ConsumerError::Append {
                        sheet: self.sheet_name.clone(),
                        source,
                    });
                }
            }
        }
    }
}
