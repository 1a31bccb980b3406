use connectors::error::SheetsError;
use engine_core::settings::error::SettingsError;
use engine_processing::error::{ConsumerError, ProducerError};
use thiserror::Error;

/// Errors surfaced to the host driving a connector.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Credentials could not be loaded or the client could not be built.
    #[error("Failed to initialize the sheets client: {0}")]
    Client(#[from] SheetsError),

    #[error("Read failed: {0}")]
    Producer(#[from] ProducerError),

    #[error("Write failed: {0}")]
    Consumer(#[from] ConsumerError),

    #[error("Connector used before configure")]
    NotConfigured,

    #[error("Connector used before open")]
    NotOpened,

    /// No record can be produced now; the host should back off and call again.
    #[error("No record available, retry later")]
    BackoffRetry,
}

impl RuntimeError {
    pub fn is_cancelled(&self) -> bool {
        match self {
            RuntimeError::Producer(e) => e.is_cancelled(),
            RuntimeError::Consumer(e) => e.is_cancelled(),
            _ => false,
        }
    }

    /// A poll of the sheet failed. The source stays open and the next
    /// `read` waits one polling period before polling again.
    pub fn is_retryable_read(&self) -> bool {
        matches!(self, RuntimeError::Producer(ProducerError::Fetch { .. }))
    }
}
