use crate::error::SheetsError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::{fs, path::Path, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, info};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed ahead of use.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Supplies bearer tokens for Sheets API calls.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, SheetsError>;
}

/// A fixed token, mainly for tests and short-lived tools.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, SheetsError> {
        Ok(self.0.clone())
    }
}

/// OAuth client identity as found in a Google `credentials.json`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Deserialize)]
struct ClientSecrets {
    installed: Option<ClientConfig>,
    web: Option<ClientConfig>,
}

/// Contents of `token.json`. Only the refresh token is required.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoredToken {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        if self.value.is_empty() {
            return false;
        }
        match self.expires_at {
            Some(at) => at - Duration::seconds(EXPIRY_SKEW_SECS) > now,
            None => false,
        }
    }
}

pub fn parse_client_config(content: &str) -> Result<ClientConfig, SheetsError> {
    let secrets: ClientSecrets = serde_json::from_str(content)?;
    secrets
        .installed
        .or(secrets.web)
        .ok_or_else(|| SheetsError::Auth("credentials have neither 'installed' nor 'web' client".into()))
}

pub fn parse_stored_token(content: &str) -> Result<StoredToken, SheetsError> {
    let token: StoredToken = serde_json::from_str(content)?;
    if token.refresh_token.is_empty() {
        return Err(SheetsError::Auth("token file has no refresh_token".into()));
    }
    Ok(token)
}

/// Refreshes the access token with the stored refresh token whenever the
/// cached one is missing or about to expire.
pub struct RefreshingTokenSource {
    http: reqwest::Client,
    client: ClientConfig,
    refresh_token: String,
    cached: Mutex<CachedToken>,
}

impl RefreshingTokenSource {
    pub fn new(http: reqwest::Client, client: ClientConfig, token: StoredToken) -> Self {
        RefreshingTokenSource {
            http,
            client,
            refresh_token: token.refresh_token,
            cached: Mutex::new(CachedToken {
                value: token.access_token,
                expires_at: token.expiry,
            }),
        }
    }

    /// Loads `credentials.json` and `token.json` from disk.
    pub fn from_files(
        credentials_file: impl AsRef<Path>,
        tokens_file: impl AsRef<Path>,
    ) -> Result<Self, SheetsError> {
        let client = parse_client_config(&fs::read_to_string(credentials_file.as_ref())?)?;
        let token = parse_stored_token(&fs::read_to_string(tokens_file.as_ref())?)?;
        Ok(Self::new(reqwest::Client::new(), client, token))
    }

    pub fn into_shared(self) -> Arc<dyn TokenSource> {
        Arc::new(self)
    }

    async fn refresh(&self) -> Result<CachedToken, SheetsError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client.client_id.as_str()),
            ("client_secret", self.client.client_secret.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
        ];

        let resp = self
            .http
            .post(&self.client.token_uri)
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(SheetsError::Auth(format!(
                "token refresh failed ({status}): {}",
                body.trim()
            )));
        }

        let refreshed: RefreshResponse = serde_json::from_str(&body)?;
        let expires_at = refreshed
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));

        info!(expires_at = ?expires_at, "Refreshed OAuth access token");
        Ok(CachedToken {
            value: refreshed.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl TokenSource for RefreshingTokenSource {
    async fn access_token(&self) -> Result<String, SheetsError> {
        let mut cached = self.cached.lock().await;
        if cached.is_fresh(Utc::now()) {
            return Ok(cached.value.clone());
        }

        debug!("Access token missing or expiring, refreshing");
        *cached = self.refresh().await?;
        Ok(cached.value.clone())
    }
}
