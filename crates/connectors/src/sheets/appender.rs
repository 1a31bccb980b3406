use crate::{
    error::SheetsError,
    sheets::{client::SheetsClient, options::ValueInputOption},
};
use async_trait::async_trait;
use model::records::row::Row;
use tracing::debug;

/// Destination for row batches. One call is one append request.
#[async_trait]
pub trait RowSink: Send {
    async fn append(&mut self, rows: &[Row]) -> Result<(), SheetsError>;
}

/// Appends rows after the last table row of a named sheet.
pub struct SheetAppender {
    client: SheetsClient,
    spreadsheet_id: String,
    sheet_name: String,
    value_input: ValueInputOption,
}

impl SheetAppender {
    pub fn new(
        client: SheetsClient,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        value_input: ValueInputOption,
    ) -> Self {
        SheetAppender {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
            value_input,
        }
    }
}

#[async_trait]
impl RowSink for SheetAppender {
    async fn append(&mut self, rows: &[Row]) -> Result<(), SheetsError> {
        let resp = self
            .client
            .append_values(&self.spreadsheet_id, &self.sheet_name, rows, self.value_input)
            .await?;

        debug!(
            sheet = %self.sheet_name,
            updated_range = ?resp.updates.updated_range,
            updated_rows = resp.updates.updated_rows,
            "Appended rows"
        );
        Ok(())
    }
}
