use crate::{
    connectors::source::SheetsSource,
    error::RuntimeError,
    tests::{FlakySheet, MemorySheet, base_config, row},
};
use engine_core::settings::error::SettingsError;
use engine_processing::error::ProducerError;
use model::{
    pagination::position::{Cursor, Position},
    records::record::Data,
};
use serde_json::json;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;

const SPREADSHEET: &str = "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms";

fn configured(file: &NamedTempFile) -> SheetsSource {
    let mut cfg = base_config(file);
    cfg.insert("pollingPeriod".into(), "1s".into());
    cfg.insert("headerRow".into(), "true".into());

    let mut source = SheetsSource::new();
    source.configure(&cfg).unwrap();
    source
}

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_lifecycle_reads_and_resumes() {
    let file = NamedTempFile::new().unwrap();
    let sheet = MemorySheet::new(vec![
        row(&["sku", "qty"]),
        row(&["A-1", "2"]),
        row(&["B-7", "5"]),
    ]);
    let cancel = CancellationToken::new();

    let mut source = configured(&file);
    assert_eq!(source.settings().unwrap().sheets.sheet_id, 3);
    source.open_with(sheet.clone(), None).await.unwrap();

    let first = source.read(&cancel).await.unwrap();
    assert_eq!(
        first.payload,
        Some(Data::Structured(
            serde_json::from_value(json!({"sku": "A-1", "qty": "2"})).unwrap()
        ))
    );
    source.ack(&first.position).unwrap();
    assert!(logs_contain("Position acknowledged."));
    source.teardown();

    // A fresh instance resumes after the acknowledged row.
    let mut resumed = configured(&file);
    resumed.open_with(sheet, Some(&first.position)).await.unwrap();
    let second = resumed.read(&cancel).await.unwrap();
    assert_eq!(
        Cursor::decode(Some(&second.position)).unwrap(),
        Cursor::new(3, SPREADSHEET, 3)
    );
    resumed.teardown();
}

#[tokio::test]
async fn test_configure_rejects_missing_keys() {
    let mut source = SheetsSource::new();
    let err = source.configure(&Default::default()).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Settings(SettingsError::Missing("credentialsFile"))
    ));
}

#[tokio::test]
async fn test_open_requires_configure() {
    let mut source = SheetsSource::new();
    let err = source.open(None).await.unwrap_err();
    assert!(matches!(err, RuntimeError::NotConfigured));
}

#[tokio::test]
async fn test_open_with_unreadable_credentials() {
    let file = NamedTempFile::new().unwrap();
    let mut source = configured(&file);

    // The credentials file exists but holds no client config.
    let err = source.open(None).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Client(_)));
}

#[tokio::test]
async fn test_read_before_open() {
    let mut source = SheetsSource::new();
    let err = source.read(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::NotOpened));
}

#[tokio::test]
async fn test_open_rejects_foreign_position() {
    let file = NamedTempFile::new().unwrap();
    let mut source = configured(&file);
    let position = Cursor::new(4, "another-spreadsheet", 3).encode();

    let err = source
        .open_with(MemorySheet::default(), Some(&position))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Producer(ProducerError::PositionMismatch { .. })
    ));
}

#[tokio::test]
async fn test_open_rejects_undecodable_position() {
    let file = NamedTempFile::new().unwrap();
    let mut source = configured(&file);

    let err = source
        .open_with(MemorySheet::default(), Some(&Position::from("{")))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Producer(ProducerError::Position(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_read_backs_off_once_stopped() {
    let file = NamedTempFile::new().unwrap();
    let mut source = configured(&file);
    source.open_with(MemorySheet::default(), None).await.unwrap();

    let stop = source.stop_handle().unwrap();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        stop.cancel();
    });

    let cancel = CancellationToken::new();
    let err = source.read(&cancel).await.unwrap_err();
    assert!(err.is_cancelled());

    let err = source.read(&cancel).await.unwrap_err();
    assert!(matches!(err, RuntimeError::BackoffRetry));
}

#[tokio::test(start_paused = true)]
async fn test_caller_cancel_is_graceful() {
    let file = NamedTempFile::new().unwrap();
    let mut source = configured(&file);
    source.open_with(MemorySheet::default(), None).await.unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = source.read(&cancel).await.unwrap_err();
    assert!(err.is_cancelled());

    source.teardown();
    assert!(source.stop_handle().is_none());
    assert!(matches!(
        source.read(&cancel).await.unwrap_err(),
        RuntimeError::NotOpened
    ));
}

#[tokio::test(start_paused = true)]
async fn test_failed_poll_keeps_source_open() {
    let file = NamedTempFile::new().unwrap();
    let sheet = FlakySheet::new(vec![row(&["sku"]), row(&["A-1"])]);
    let cancel = CancellationToken::new();

    let mut source = configured(&file);
    source.open_with(sheet.clone(), None).await.unwrap();
    source.read(&cancel).await.unwrap();

    sheet.fail_next(1);
    let err = source.read(&cancel).await.unwrap_err();
    assert!(err.is_retryable_read());
    assert!(!err.is_cancelled());

    sheet.push(row(&["B-7"]));
    let record = source.read(&cancel).await.unwrap();
    assert_eq!(
        Cursor::decode(Some(&record.position)).unwrap(),
        Cursor::new(3, SPREADSHEET, 3)
    );

    assert!(!RuntimeError::NotOpened.is_retryable_read());
    source.teardown();
}
