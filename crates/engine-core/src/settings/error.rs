use connectors::error::SheetsError;
use thiserror::Error;

/// Errors raised while parsing connector configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A required key is absent or blank.
    #[error("\"{0}\" config value must be set")]
    Missing(&'static str),

    /// A key is present but its value cannot be used.
    #[error("Invalid value for \"{key}\": {reason}")]
    Invalid { key: &'static str, reason: String },

    /// The sheets URL does not identify a spreadsheet.
    #[error("Invalid sheets URL: {0}")]
    SheetUrl(#[source] SheetsError),
}
