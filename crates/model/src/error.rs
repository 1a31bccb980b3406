use thiserror::Error;

#[derive(Debug, Error)]
pub enum PositionError {
    /// The token was not empty but did not hold an encoded cursor.
    #[error("Failed to decode position token: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Invalid row offset in position: {0}")]
    NegativeOffset(i64),
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Record payload is empty")]
    EmptyPayload,

    /// Payload bytes are neither a JSON object nor a flat JSON array.
    #[error("Record payload is neither structured data nor a row: {0}")]
    Malformed(#[source] serde_json::Error),
}
