use crate::settings::{RawConfig, error::SettingsError, optional, parse_or, sheets::SheetsSettings};
use connectors::sheets::options::{DateTimeRenderOption, ValueRenderOption};
use std::time::Duration;

pub const KEY_POLLING_PERIOD: &str = "pollingPeriod";
pub const KEY_DATE_TIME_RENDER_OPTION: &str = "dateTimeRenderOption";
pub const KEY_VALUE_RENDER_OPTION: &str = "valueRenderOption";
pub const KEY_BATCH_SIZE: &str = "batchSize";
pub const KEY_HEADER_ROW: &str = "headerRow";

pub const DEFAULT_POLLING_PERIOD: &str = "6s";
pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    pub sheets: SheetsSettings,
    pub polling_period: Duration,
    pub date_time_render: DateTimeRenderOption,
    pub value_render: ValueRenderOption,
    /// Rows requested per fetch.
    pub batch_size: usize,
    /// Treat the first row as field names instead of data.
    pub header_row: bool,
}

impl SourceSettings {
    pub fn parse(cfg: &RawConfig) -> Result<Self, SettingsError> {
        let sheets = SheetsSettings::parse(cfg)?;

        let period = optional(cfg, KEY_POLLING_PERIOD).unwrap_or(DEFAULT_POLLING_PERIOD);
        let polling_period = humantime::parse_duration(period).map_err(|e| SettingsError::Invalid {
            key: KEY_POLLING_PERIOD,
            reason: format!("'{period}' cannot be parsed as a duration: {e}"),
        })?;
        if polling_period.is_zero() {
            return Err(SettingsError::Invalid {
                key: KEY_POLLING_PERIOD,
                reason: "must be greater than zero".into(),
            });
        }

        let batch_size = parse_or(cfg, KEY_BATCH_SIZE, DEFAULT_BATCH_SIZE)?;
        if batch_size == 0 {
            return Err(SettingsError::Invalid {
                key: KEY_BATCH_SIZE,
                reason: "must be greater than zero".into(),
            });
        }

        Ok(SourceSettings {
            sheets,
            polling_period,
            date_time_render: parse_or(cfg, KEY_DATE_TIME_RENDER_OPTION, DateTimeRenderOption::default())?,
            value_render: parse_or(cfg, KEY_VALUE_RENDER_OPTION, ValueRenderOption::default())?,
            batch_size,
            header_row: parse_or(cfg, KEY_HEADER_ROW, false)?,
        })
    }
}
