use crate::{
    error::SheetsError,
    sheets::{
        client::SheetsClient,
        options::{DateTimeRenderOption, ValueRenderOption},
    },
};
use async_trait::async_trait;
use model::records::row::Row;
use tracing::{debug, info};

/// A bounded window of rows, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: u64,
    pub len: u64,
}

impl RowRange {
    pub fn new(start: u64, len: u64) -> Self {
        RowRange {
            start,
            len: len.max(1),
        }
    }

    /// A1 notation covering whole rows, e.g. `'Sheet 1'!3:12`.
    pub fn to_a1(&self, sheet_title: &str) -> String {
        format!(
            "{}!{}:{}",
            quote_sheet_title(sheet_title),
            self.start + 1,
            self.start + self.len
        )
    }
}

/// Rows returned for a fetch together with the index of the first one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowWindow {
    pub start: u64,
    pub rows: Vec<Row>,
}

/// Source of sheet rows. Implementations do not retry.
#[async_trait]
pub trait RowSource: Send {
    async fn fetch(&mut self, range: RowRange) -> Result<RowWindow, SheetsError>;
}

/// Reads windows of one sheet through the values endpoint.
pub struct SheetBatchReader {
    client: SheetsClient,
    spreadsheet_id: String,
    sheet_id: i64,
    date_time_render: DateTimeRenderOption,
    value_render: ValueRenderOption,
    sheet_title: Option<String>,
}

impl SheetBatchReader {
    pub fn new(
        client: SheetsClient,
        spreadsheet_id: impl Into<String>,
        sheet_id: i64,
        date_time_render: DateTimeRenderOption,
        value_render: ValueRenderOption,
    ) -> Self {
        SheetBatchReader {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_id,
            date_time_render,
            value_render,
            sheet_title: None,
        }
    }

    async fn title(&mut self) -> Result<String, SheetsError> {
        if let Some(title) = &self.sheet_title {
            return Ok(title.clone());
        }

        let title = self
            .client
            .sheet_title(&self.spreadsheet_id, self.sheet_id)
            .await?;
        info!(sheet_id = self.sheet_id, title = %title, "Resolved sheet title");
        self.sheet_title = Some(title.clone());
        Ok(title)
    }
}

#[async_trait]
impl RowSource for SheetBatchReader {
    async fn fetch(&mut self, range: RowRange) -> Result<RowWindow, SheetsError> {
        let title = self.title().await?;
        let a1 = range.to_a1(&title);

        let values = self
            .client
            .get_values(
                &self.spreadsheet_id,
                &a1,
                self.date_time_render,
                self.value_render,
            )
            .await?;

        let start = range_start(&values.range).unwrap_or(range.start);
        debug!(requested = %a1, start, rows = values.values.len(), "Fetched row window");

        Ok(RowWindow {
            start,
            rows: values.values,
        })
    }
}

/// Quotes a sheet title for A1 notation, doubling embedded apostrophes.
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Zero-based first row of an A1 range such as `'Sheet1'!A3:Z10` or `Sheet1!3:10`.
pub fn range_start(a1: &str) -> Option<u64> {
    let cells = a1.rsplit_once('!').map(|(_, c)| c).unwrap_or(a1);
    let first = cells.split(':').next()?;
    let digits: String = first
        .trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == '$')
        .chars()
        .filter(|c| *c != '$')
        .collect();
    let row: u64 = digits.parse().ok()?;
    row.checked_sub(1)
}
