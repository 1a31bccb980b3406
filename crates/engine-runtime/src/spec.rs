use connectors::sheets::options::{DateTimeRenderOption, ValueInputOption, ValueRenderOption};
use engine_core::settings::{
    destination::{DEFAULT_MAX_RETRIES, KEY_MAX_RETRIES, KEY_SHEET_NAME, KEY_VALUE_INPUT_OPTION},
    sheets::{KEY_CREDENTIALS_FILE, KEY_SHEETS_URL, KEY_TOKENS_FILE},
    source::{
        DEFAULT_BATCH_SIZE, DEFAULT_POLLING_PERIOD, KEY_BATCH_SIZE, KEY_DATE_TIME_RENDER_OPTION,
        KEY_HEADER_ROW, KEY_POLLING_PERIOD, KEY_VALUE_RENDER_OPTION,
    },
};
use serde::Serialize;

/// Description of one configuration key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub required: bool,
}

impl Parameter {
    fn required(name: &'static str, description: &'static str) -> Self {
        Parameter {
            name,
            description,
            default: None,
            required: true,
        }
    }

    fn optional(name: &'static str, description: &'static str, default: impl ToString) -> Self {
        Parameter {
            name,
            description,
            default: Some(default.to_string()),
            required: false,
        }
    }
}

fn shared_parameters() -> Vec<Parameter> {
    vec![
        Parameter::required(
            KEY_CREDENTIALS_FILE,
            "Path to the OAuth client credentials JSON file.",
        ),
        Parameter::required(
            KEY_TOKENS_FILE,
            "Path to the JSON file holding the OAuth access and refresh tokens.",
        ),
        Parameter::required(
            KEY_SHEETS_URL,
            "URL of the sheet, e.g. https://docs.google.com/spreadsheets/d/<id>/edit#gid=<sheet id>.",
        ),
    ]
}

pub fn source_parameters() -> Vec<Parameter> {
    let mut params = shared_parameters();
    params.extend([
        Parameter::optional(
            KEY_POLLING_PERIOD,
            "How long to wait before polling the sheet again when no new rows were found.",
            DEFAULT_POLLING_PERIOD,
        ),
        Parameter::optional(
            KEY_DATE_TIME_RENDER_OPTION,
            "How dates and times are rendered: FORMATTED_STRING or SERIAL_NUMBER.",
            DateTimeRenderOption::default(),
        ),
        Parameter::optional(
            KEY_VALUE_RENDER_OPTION,
            "How values are rendered: FORMATTED_VALUE, UNFORMATTED_VALUE or FORMULA.",
            ValueRenderOption::default(),
        ),
        Parameter::optional(
            KEY_BATCH_SIZE,
            "Maximum number of rows requested per poll.",
            DEFAULT_BATCH_SIZE,
        ),
        Parameter::optional(
            KEY_HEADER_ROW,
            "Use the first row as field names instead of column indexes.",
            false,
        ),
    ]);
    params
}

pub fn destination_parameters() -> Vec<Parameter> {
    let mut params = shared_parameters();
    params.extend([
        Parameter::required(KEY_SHEET_NAME, "Name of the sheet rows are appended to."),
        Parameter::optional(
            KEY_VALUE_INPUT_OPTION,
            "How input data is interpreted: USER_ENTERED or RAW.",
            ValueInputOption::default(),
        ),
        Parameter::optional(
            KEY_MAX_RETRIES,
            "Rate-limit retries allowed before a write fails.",
            DEFAULT_MAX_RETRIES,
        ),
    ]);
    params
}
