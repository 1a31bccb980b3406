use engine_runtime::error::RuntimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Config(String),

    #[error("Failed to parse input line {line}: {source}")]
    InputParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Connector error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Shutdown requested")]
    ShutdownRequested,
}

impl CliError {
    pub fn is_shutdown(&self) -> bool {
        match self {
            CliError::ShutdownRequested => true,
            CliError::Runtime(e) => e.is_cancelled(),
            _ => false,
        }
    }
}
