use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid value '{value}', expected one of: {expected}")]
pub struct ParseOptionError {
    pub value: String,
    pub expected: &'static str,
}

/// How date, time and duration cells are rendered on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateTimeRenderOption {
    SerialNumber,
    #[default]
    FormattedString,
}

/// How computed cells are rendered on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueRenderOption {
    #[default]
    FormattedValue,
    UnformattedValue,
    Formula,
}

/// How appended values are interpreted by the sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    #[default]
    UserEntered,
    Raw,
}

impl DateTimeRenderOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateTimeRenderOption::SerialNumber => "SERIAL_NUMBER",
            DateTimeRenderOption::FormattedString => "FORMATTED_STRING",
        }
    }
}

impl ValueRenderOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueRenderOption::FormattedValue => "FORMATTED_VALUE",
            ValueRenderOption::UnformattedValue => "UNFORMATTED_VALUE",
            ValueRenderOption::Formula => "FORMULA",
        }
    }
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::UserEntered => "USER_ENTERED",
            ValueInputOption::Raw => "RAW",
        }
    }
}

impl FromStr for DateTimeRenderOption {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SERIAL_NUMBER" => Ok(DateTimeRenderOption::SerialNumber),
            "FORMATTED_STRING" => Ok(DateTimeRenderOption::FormattedString),
            other => Err(ParseOptionError {
                value: other.to_string(),
                expected: "SERIAL_NUMBER, FORMATTED_STRING",
            }),
        }
    }
}

impl FromStr for ValueRenderOption {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FORMATTED_VALUE" => Ok(ValueRenderOption::FormattedValue),
            "UNFORMATTED_VALUE" => Ok(ValueRenderOption::UnformattedValue),
            "FORMULA" => Ok(ValueRenderOption::Formula),
            other => Err(ParseOptionError {
                value: other.to_string(),
                expected: "FORMATTED_VALUE, UNFORMATTED_VALUE, FORMULA",
            }),
        }
    }
}

impl FromStr for ValueInputOption {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER_ENTERED" => Ok(ValueInputOption::UserEntered),
            "RAW" => Ok(ValueInputOption::Raw),
            other => Err(ParseOptionError {
                value: other.to_string(),
                expected: "USER_ENTERED, RAW",
            }),
        }
    }
}

impl fmt::Display for DateTimeRenderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ValueRenderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ValueInputOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!(
            "SERIAL_NUMBER".parse::<DateTimeRenderOption>().unwrap(),
            DateTimeRenderOption::SerialNumber
        );
        assert_eq!(
            "FORMULA".parse::<ValueRenderOption>().unwrap(),
            ValueRenderOption::Formula
        );
        assert_eq!(
            "RAW".parse::<ValueInputOption>().unwrap(),
            ValueInputOption::Raw
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "raw".parse::<ValueInputOption>().unwrap_err();
        assert_eq!(err.value, "raw");
        assert_eq!(
            err.to_string(),
            "Invalid value 'raw', expected one of: USER_ENTERED, RAW"
        );
    }

    #[test]
    fn test_defaults_match_api_defaults() {
        assert_eq!(DateTimeRenderOption::default().as_str(), "FORMATTED_STRING");
        assert_eq!(ValueRenderOption::default().as_str(), "FORMATTED_VALUE");
        assert_eq!(ValueInputOption::default().as_str(), "USER_ENTERED");
    }
}
