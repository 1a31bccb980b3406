use crate::error::CliError;
use model::pagination::position::Position;
use std::{io::ErrorKind, path::Path};

/// Reads the stored position. A missing or blank file means "start of sheet".
pub async fn load(path: &Path) -> Result<Option<Position>, CliError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(Position::from(content.trim()))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replaces the stored position through a temporary file and a rename.
pub async fn store(path: &Path, position: &Position) -> Result<(), CliError> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, position.as_bytes()).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
