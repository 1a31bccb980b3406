use thiserror::Error;

/// A wait was interrupted by the caller or by a stop request.
///
/// Kept distinct from every other failure so that hosts can treat it as a
/// graceful shutdown.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Operation cancelled")]
pub struct Cancelled;
