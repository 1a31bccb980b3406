use crate::error::RuntimeError;
use connectors::sheets::{
    auth::RefreshingTokenSource,
    client::SheetsClient,
    reader::{RowSource, SheetBatchReader},
};
use engine_core::settings::{RawConfig, source::SourceSettings};
use engine_processing::producer::{
    RecordIterator,
    iterator::{IteratorConfig, SheetsIterator},
};
use model::{pagination::position::Position, records::record::ChangeRecord};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Source side of the connector: configure, open, read, ack, teardown.
#[derive(Default)]
pub struct SheetsSource {
    settings: Option<SourceSettings>,
    iterator: Option<Box<dyn RecordIterator>>,
    stop: Option<CancellationToken>,
}

impl SheetsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(&mut self, cfg: &RawConfig) -> Result<(), RuntimeError> {
        let settings = SourceSettings::parse(cfg)?;
        info!(
            spreadsheet_id = %settings.sheets.spreadsheet_id,
            sheet_id = settings.sheets.sheet_id,
            polling_period = ?settings.polling_period,
            batch_size = settings.batch_size,
            header_row = settings.header_row,
            "Source configured."
        );
        self.settings = Some(settings);
        Ok(())
    }

    pub fn settings(&self) -> Option<&SourceSettings> {
        self.settings.as_ref()
    }

    /// Loads credentials and starts iterating from `position`.
    pub async fn open(&mut self, position: Option<&Position>) -> Result<(), RuntimeError> {
        let settings = self.settings.as_ref().ok_or(RuntimeError::NotConfigured)?;

        let tokens =
            RefreshingTokenSource::from_files(&settings.sheets.credentials_file, &settings.sheets.tokens_file)?
                .into_shared();
        let reader = SheetBatchReader::new(
            SheetsClient::new(tokens)?,
            settings.sheets.spreadsheet_id.clone(),
            settings.sheets.sheet_id,
            settings.date_time_render,
            settings.value_render,
        );

        self.open_with(reader, position).await
    }

    /// Starts iterating over rows supplied by `reader`.
    pub async fn open_with<R>(
        &mut self,
        reader: R,
        position: Option<&Position>,
    ) -> Result<(), RuntimeError>
    where
        R: RowSource + 'static,
    {
        let settings = self.settings.as_ref().ok_or(RuntimeError::NotConfigured)?;
        let config = IteratorConfig {
            spreadsheet_id: settings.sheets.spreadsheet_id.clone(),
            sheet_id: settings.sheets.sheet_id,
            polling_period: settings.polling_period,
            batch_size: settings.batch_size,
            header_row: settings.header_row,
        };

        let iterator = SheetsIterator::open(reader, config, position).await?;
        self.stop = Some(iterator.stop_handle());
        self.iterator = Some(Box::new(iterator));
        Ok(())
    }

    /// Token that stops the open iterator from another task.
    pub fn stop_handle(&self) -> Option<CancellationToken> {
        self.stop.clone()
    }

    pub async fn read(&mut self, cancel: &CancellationToken) -> Result<ChangeRecord, RuntimeError> {
        let iterator = self.iterator.as_mut().ok_or(RuntimeError::NotOpened)?;
        if !iterator.has_next() {
            return Err(RuntimeError::BackoffRetry);
        }
        Ok(iterator.next(cancel).await?)
    }

    /// Rows are never removed from the sheet, so there is nothing to confirm upstream.
    pub fn ack(&self, position: &Position) -> Result<(), RuntimeError> {
        debug!(position = %position, "Position acknowledged.");
        Ok(())
    }

    pub fn teardown(&mut self) {
        self.stop = None;
        if let Some(mut iterator) = self.iterator.take() {
            iterator.stop();
            info!("Source torn down.");
        }
    }
}
