use crate::error::Cancelled;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Sleeps for `period` unless `cancel` fires first.
pub async fn sleep_or_cancel(period: Duration, cancel: &CancellationToken) -> Result<(), Cancelled> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Cancelled),
        _ = sleep(period) => Ok(()),
    }
}

/// Like [`sleep_or_cancel`], interrupted by whichever token fires first.
pub async fn sleep_or_cancel_either(
    period: Duration,
    caller: &CancellationToken,
    stop: &CancellationToken,
) -> Result<(), Cancelled> {
    tokio::select! {
        biased;
        _ = caller.cancelled() => Err(Cancelled),
        _ = stop.cancelled() => Err(Cancelled),
        _ = sleep(period) => Ok(()),
    }
}
