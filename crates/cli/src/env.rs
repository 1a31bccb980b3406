use crate::error::CliError;
use engine_core::settings::RawConfig;
use std::{fs, path::Path};

/// Connector configuration read from a `KEY=VALUE` file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    vars: RawConfig,
}

impl ConfigFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let mut file = ConfigFile::default();
        file.parse_content(&content)?;
        Ok(file)
    }

    pub fn vars(&self) -> &RawConfig {
        &self.vars
    }

    fn parse_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars.insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic_config() {
        let mut file = ConfigFile::default();
        let content = r#"
# source
credentialsFile=/etc/sheetsync/credentials.json
sheetsURL = https://docs.google.com/spreadsheets/d/abc/edit#gid=5
        "#;

        file.parse_content(content).unwrap();
        assert_eq!(
            file.vars()["credentialsFile"],
            "/etc/sheetsync/credentials.json"
        );
        // '#' inside a value is not a comment
        assert_eq!(
            file.vars()["sheetsURL"],
            "https://docs.google.com/spreadsheets/d/abc/edit#gid=5"
        );
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut file = ConfigFile::default();
        let content = r#"
sheetName="Orders 2024"
pollingPeriod='30s'
batchSize=500
        "#;

        file.parse_content(content).unwrap();
        assert_eq!(file.vars()["sheetName"], "Orders 2024");
        assert_eq!(file.vars()["pollingPeriod"], "30s");
        assert_eq!(file.vars()["batchSize"], "500");
    }

    #[test]
    fn test_invalid_lines() {
        let mut file = ConfigFile::default();
        assert!(file.parse_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(file.parse_content("=value").is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "maxRetries=5").unwrap();

        let file = ConfigFile::load(tmp.path()).unwrap();
        assert_eq!(file.vars()["maxRetries"], "5");

        let err = ConfigFile::load("/no/such/sheetsync.conf").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
