use crate::{
    error::SheetsError,
    sheets::{
        auth::TokenSource,
        options::{DateTimeRenderOption, ValueInputOption, ValueRenderOption},
    },
};
use model::records::row::Row;
use reqwest::{RequestBuilder, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/";

const MAJOR_DIMENSION: &str = "ROWS";
const INSERT_DATA_OPTION: &str = "INSERT_ROWS";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub values: Vec<Row>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    #[serde(default)]
    pub updates: AppendUpdates,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendUpdates {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppendBody<'a> {
    range: &'a str,
    major_dimension: &'a str,
    values: &'a [Row],
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    #[serde(default)]
    sheet_id: i64,
    title: String,
}

/// Thin wrapper over the Sheets v4 REST endpoints the connector needs.
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenSource>,
}

impl SheetsClient {
    pub fn new(tokens: Arc<dyn TokenSource>) -> Result<Self, SheetsError> {
        Self::with_base_url(reqwest::Client::new(), DEFAULT_BASE_URL, tokens)
    }

    pub fn with_base_url(
        http: reqwest::Client,
        base_url: &str,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, SheetsError> {
        let base_url =
            Url::parse(base_url).map_err(|e| SheetsError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(SheetsClient {
            http,
            base_url,
            tokens,
        })
    }

    /// Resolves the title of the sheet with the given numeric id (the `gid`).
    pub async fn sheet_title(
        &self,
        spreadsheet_id: &str,
        sheet_id: i64,
    ) -> Result<String, SheetsError> {
        let url = self.endpoint(&["spreadsheets", spreadsheet_id])?;
        let req = self
            .http
            .get(url)
            .query(&[("fields", "sheets.properties(sheetId,title)")]);

        let meta: SpreadsheetMeta = self.send(req).await?;
        meta.sheets
            .into_iter()
            .map(|s| s.properties)
            .find(|p| p.sheet_id == sheet_id)
            .map(|p| p.title)
            .ok_or_else(|| SheetsError::SheetNotFound {
                spreadsheet_id: spreadsheet_id.to_string(),
                sheet_id,
            })
    }

    pub async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        date_time_render: DateTimeRenderOption,
        value_render: ValueRenderOption,
    ) -> Result<ValueRange, SheetsError> {
        let url = self.endpoint(&["spreadsheets", spreadsheet_id, "values", range])?;
        let req = self.http.get(url).query(&[
            ("majorDimension", MAJOR_DIMENSION),
            ("valueRenderOption", value_render.as_str()),
            ("dateTimeRenderOption", date_time_render.as_str()),
        ]);

        let values: ValueRange = self.send(req).await?;
        debug!(range = %values.range, rows = values.values.len(), "Fetched values");
        Ok(values)
    }

    pub async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Row],
        input: ValueInputOption,
    ) -> Result<AppendResponse, SheetsError> {
        let action = format!("{range}:append");
        let url = self.endpoint(&["spreadsheets", spreadsheet_id, "values", &action])?;
        let req = self
            .http
            .post(url)
            .query(&[
                ("valueInputOption", input.as_str()),
                ("insertDataOption", INSERT_DATA_OPTION),
            ])
            .json(&AppendBody {
                range,
                major_dimension: MAJOR_DIMENSION,
                values: rows,
            });

        self.send(req).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SheetsError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, SheetsError> {
        let token = self.tokens.access_token().await?;
        let resp = req.bearer_auth(token).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SheetsError::from_response(status.as_u16(), &body));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
