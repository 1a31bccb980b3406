use crate::{error::CliError, position};
use engine_runtime::{connectors::source::SheetsSource, error::RuntimeError};
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Failed polls in a row tolerated before `read` gives up.
pub const MAX_CONSECUTIVE_FETCH_FAILURES: u32 = 5;

/// Writes every record the source produces to `out` as one JSON line,
/// acknowledging and persisting its position after each write. Returns the
/// number of records written once the source stops.
pub async fn stream_records<W>(
    source: &mut SheetsSource,
    out: &mut W,
    position_file: Option<&Path>,
    cancel: &CancellationToken,
) -> Result<u64, CliError>
where
    W: AsyncWrite + Unpin,
{
    let mut emitted = 0u64;
    let mut failures = 0u32;

    loop {
        let record = match source.read(cancel).await {
            Ok(record) => record,
            Err(RuntimeError::BackoffRetry) => break,
            Err(e) if e.is_retryable_read() && failures < MAX_CONSECUTIVE_FETCH_FAILURES => {
                failures += 1;
                warn!(error = %e, failures, "Sheet poll failed, retrying.");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        failures = 0;

        let mut line = serde_json::to_vec(&record).map_err(CliError::JsonSerialize)?;
        line.push(b'\n');
        out.write_all(&line).await?;
        out.flush().await?;

        source.ack(&record.position)?;
        if let Some(path) = position_file {
            position::store(path, &record.position).await?;
        }
        emitted += 1;
    }

    info!(records = emitted, "Source stopped");
    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use connectors::{
        error::SheetsError,
        sheets::reader::{RowRange, RowSource, RowWindow},
    };
    use engine_core::settings::RawConfig;
    use model::records::row::Row;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use tempfile::NamedTempFile;
    use tracing_test::traced_test;

    /// Answers fetches from a script, then fails every fetch after it.
    struct ScriptedSheet {
        replies: VecDeque<Result<RowWindow, u16>>,
    }

    #[async_trait]
    impl RowSource for ScriptedSheet {
        async fn fetch(&mut self, _range: RowRange) -> Result<RowWindow, SheetsError> {
            match self.replies.pop_front() {
                Some(Ok(window)) => Ok(window),
                Some(Err(status)) => Err(SheetsError::from_response(status, "unavailable")),
                None => Err(SheetsError::from_response(503, "unavailable")),
            }
        }
    }

    fn window(start: u64, cells: &[&str]) -> Result<RowWindow, u16> {
        Ok(RowWindow {
            start,
            rows: cells
                .iter()
                .map(|c| Row::new(vec![Value::from(*c)]))
                .collect(),
        })
    }

    async fn open_source(file: &NamedTempFile, sheet: ScriptedSheet) -> SheetsSource {
        let path = file.path().display().to_string();
        let cfg = RawConfig::from([
            ("credentialsFile".to_string(), path.clone()),
            ("tokensFile".to_string(), path),
            (
                "sheetsURL".to_string(),
                "https://docs.google.com/spreadsheets/d/abc/edit#gid=0".to_string(),
            ),
        ]);

        let mut source = SheetsSource::new();
        source.configure(&cfg).unwrap();
        source.open_with(sheet, None).await.unwrap();
        source
    }

    #[traced_test]
    #[tokio::test(start_paused = true)]
    async fn test_poll_failures_are_retried_until_the_ceiling() {
        let file = NamedTempFile::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let position_file = dir.path().join("position");
        let sheet = ScriptedSheet {
            replies: VecDeque::from([window(0, &["a"]), Err(503), Err(500), window(1, &["b"])]),
        };
        let mut source = open_source(&file, sheet).await;
        let mut out = Vec::new();

        let err = stream_records(
            &mut source,
            &mut out,
            Some(&position_file),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Runtime(ref e) if e.is_retryable_read()));
        assert!(logs_contain("Sheet poll failed, retrying."));

        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["payload"], json!({"0": "a"}));
        assert_eq!(lines[1]["payload"], json!({"0": "b"}));

        let stored = position::load(&position_file).await.unwrap().unwrap();
        assert_eq!(stored.to_string(), lines[1]["position"].as_str().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_source_ends_cleanly() {
        let file = NamedTempFile::new().unwrap();
        let sheet = ScriptedSheet {
            replies: VecDeque::from([window(0, &["a"])]),
        };
        let mut source = open_source(&file, sheet).await;
        if let Some(stop) = source.stop_handle() {
            stop.cancel();
        }
        let mut out = Vec::new();

        let emitted = stream_records(&mut source, &mut out, None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(emitted, 0);
        assert!(out.is_empty());
    }
}
