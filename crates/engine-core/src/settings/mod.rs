use crate::settings::error::SettingsError;
use std::{collections::HashMap, fmt::Display, str::FromStr};

pub mod destination;
pub mod error;
pub mod sheets;
pub mod source;

/// Raw configuration as handed over by the host: key to string value.
pub type RawConfig = HashMap<String, String>;

/// Trimmed, non-empty value for `key`.
pub(crate) fn optional<'a>(cfg: &'a RawConfig, key: &str) -> Option<&'a str> {
    cfg.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

pub(crate) fn required<'a>(cfg: &'a RawConfig, key: &'static str) -> Result<&'a str, SettingsError> {
    optional(cfg, key).ok_or(SettingsError::Missing(key))
}

/// Parses `key` with `FromStr`, using `default` when the key is absent or blank.
pub(crate) fn parse_or<T>(cfg: &RawConfig, key: &'static str, default: T) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: Display,
{
    match optional(cfg, key) {
        Some(raw) => raw.parse::<T>().map_err(|e| SettingsError::Invalid {
            key,
            reason: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}
