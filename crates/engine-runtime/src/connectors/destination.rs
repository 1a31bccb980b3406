use crate::error::RuntimeError;
use connectors::sheets::{
    appender::{RowSink, SheetAppender},
    auth::RefreshingTokenSource,
    client::SheetsClient,
};
use engine_core::settings::{RawConfig, destination::DestinationSettings};
use engine_processing::consumer::writer::RetryingWriter;
use model::records::record::ChangeRecord;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Destination side of the connector: configure, open, write, teardown.
pub struct SheetsDestination<S: RowSink = SheetAppender> {
    settings: Option<DestinationSettings>,
    writer: Option<RetryingWriter<S>>,
}

impl<S: RowSink> Default for SheetsDestination<S> {
    fn default() -> Self {
        SheetsDestination {
            settings: None,
            writer: None,
        }
    }
}

impl SheetsDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads credentials and prepares the appender for the configured sheet.
    pub async fn open(&mut self) -> Result<(), RuntimeError> {
        let settings = self.settings.as_ref().ok_or(RuntimeError::NotConfigured)?;

        let tokens =
            RefreshingTokenSource::from_files(&settings.sheets.credentials_file, &settings.sheets.tokens_file)?
                .into_shared();
        let appender = SheetAppender::new(
            SheetsClient::new(tokens)?,
            settings.sheets.spreadsheet_id.clone(),
            settings.sheet_name.clone(),
            settings.value_input,
        );

        self.open_with(appender)
    }
}

impl<S: RowSink> SheetsDestination<S> {
    pub fn configure(&mut self, cfg: &RawConfig) -> Result<(), RuntimeError> {
        let settings = DestinationSettings::parse(cfg)?;
        info!(
            spreadsheet_id = %settings.sheets.spreadsheet_id,
            sheet = %settings.sheet_name,
            value_input = %settings.value_input,
            max_retries = settings.max_retries,
            "Destination configured."
        );
        self.settings = Some(settings);
        Ok(())
    }

    pub fn settings(&self) -> Option<&DestinationSettings> {
        self.settings.as_ref()
    }

    /// Writes through `sink` instead of the Sheets API.
    pub fn open_with(&mut self, sink: S) -> Result<(), RuntimeError> {
        let settings = self.settings.as_ref().ok_or(RuntimeError::NotConfigured)?;
        self.writer = Some(RetryingWriter::new(
            sink,
            settings.sheet_name.clone(),
            settings.max_retries,
        ));
        Ok(())
    }

    /// Returns the number of records handled, including dropped updates and deletes.
    pub async fn write(
        &mut self,
        records: &[ChangeRecord],
        cancel: &CancellationToken,
    ) -> Result<usize, RuntimeError> {
        let writer = self.writer.as_mut().ok_or(RuntimeError::NotOpened)?;
        writer.write(records, cancel).await?;
        Ok(records.len())
    }

    pub fn teardown(&mut self) {
        if self.writer.take().is_some() {
            info!("Destination torn down.");
        }
    }
}
