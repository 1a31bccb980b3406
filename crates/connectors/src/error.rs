use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Status string Google uses for quota exhaustion.
const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// All errors coming from the Sheets API layer.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Sheets API error ({status}): {message}")]
    Api {
        status: u16,
        reason: Option<String>,
        message: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Credentials could not be loaded or a token could not be refreshed.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sheet {sheet_id} not found in spreadsheet {spreadsheet_id}")]
    SheetNotFound {
        spreadsheet_id: String,
        sheet_id: i64,
    },

    #[error("Invalid sheets URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl SheetsError {
    /// Builds an [`SheetsError::Api`] from a failed response, keeping Google's
    /// error message and status string when the body carries them.
    pub fn from_response(status: u16, body: &str) -> SheetsError {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(env) => SheetsError::Api {
                status,
                reason: env.error.status,
                message: env.error.message,
            },
            Err(_) => SheetsError::Api {
                status,
                reason: None,
                message: body.trim().to_string(),
            },
        }
    }

    /// Whether the provider rejected the call for quota reasons. Transport
    /// failures never count; only decoded API responses carry a status.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            SheetsError::Api { status, reason, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16()
                    || reason.as_deref() == Some(RESOURCE_EXHAUSTED)
            }
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SheetsError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
