use crate::settings::{RawConfig, error::SettingsError, parse_or, required, sheets::SheetsSettings};
use connectors::sheets::options::ValueInputOption;

pub const KEY_SHEET_NAME: &str = "sheetName";
pub const KEY_VALUE_INPUT_OPTION: &str = "valueInputOption";
pub const KEY_MAX_RETRIES: &str = "maxRetries";

pub const DEFAULT_MAX_RETRIES: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct DestinationSettings {
    pub sheets: SheetsSettings,
    pub sheet_name: String,
    pub value_input: ValueInputOption,
    /// Rate-limit rejections tolerated before a write fails.
    pub max_retries: u64,
}

impl DestinationSettings {
    pub fn parse(cfg: &RawConfig) -> Result<Self, SettingsError> {
        Ok(DestinationSettings {
            sheets: SheetsSettings::parse(cfg)?,
            sheet_name: required(cfg, KEY_SHEET_NAME)?.to_string(),
            value_input: parse_or(cfg, KEY_VALUE_INPUT_OPTION, ValueInputOption::default())?,
            max_retries: parse_or(cfg, KEY_MAX_RETRIES, DEFAULT_MAX_RETRIES)?,
        })
    }
}
