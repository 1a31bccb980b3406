use crate::settings::{RawConfig, error::SettingsError, required};
use connectors::sheets::url::parse_sheet_url;
use std::path::{Path, PathBuf};

pub const KEY_CREDENTIALS_FILE: &str = "credentialsFile";
pub const KEY_TOKENS_FILE: &str = "tokensFile";
pub const KEY_SHEETS_URL: &str = "sheetsURL";

/// Settings shared by the source and the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetsSettings {
    pub credentials_file: PathBuf,
    pub tokens_file: PathBuf,
    pub spreadsheet_id: String,
    pub sheet_id: i64,
}

impl SheetsSettings {
    pub fn parse(cfg: &RawConfig) -> Result<Self, SettingsError> {
        let credentials_file = existing_file(cfg, KEY_CREDENTIALS_FILE)?;
        let tokens_file = existing_file(cfg, KEY_TOKENS_FILE)?;

        let url = required(cfg, KEY_SHEETS_URL)?;
        let location = parse_sheet_url(url).map_err(SettingsError::SheetUrl)?;

        Ok(SheetsSettings {
            credentials_file,
            tokens_file,
            spreadsheet_id: location.spreadsheet_id,
            sheet_id: location.sheet_id,
        })
    }
}

fn existing_file(cfg: &RawConfig, key: &'static str) -> Result<PathBuf, SettingsError> {
    let path = Path::new(required(cfg, key)?);
    if !path.is_file() {
        return Err(SettingsError::Invalid {
            key,
            reason: format!("file not found: {}", path.display()),
        });
    }
    Ok(path.to_path_buf())
}
