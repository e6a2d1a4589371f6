//! Clef REST API client.

use crate::constants::CLEF_API_BASE_URL;
use crate::error::ProviderError;
use crate::providers::ClefClient;
use crate::state::{ClefUser, UserId};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Production Clef client.
///
/// # Example
///
/// ```no_run
/// use clef_auth::providers::ClefApiClient;
/// use secrecy::SecretString;
///
/// let secret = SecretString::from(std::env::var("CLEF_APP_SECRET").unwrap());
/// let clef = ClefApiClient::initialize("your-app-id", &secret);
/// ```
#[derive(Clone, Debug)]
pub struct ClefApiClient {
    /// Application ID from the Clef dashboard.
    app_id: String,

    /// Application secret (keep confidential).
    app_secret: Arc<SecretString>,

    /// API root, without trailing slash.
    ///
    /// Default: `https://clef.io/api/v1`
    base_url: String,

    /// HTTP client for making requests.
    http_client: Client,
}

impl ClefApiClient {
    /// Create a client for one Clef application.
    #[must_use]
    pub fn initialize(app_id: impl Into<String>, app_secret: &SecretString) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: Arc::new(SecretString::from(app_secret.expose_secret().to_owned())),
            base_url: CLEF_API_BASE_URL.to_string(),
            http_client: Client::new(),
        }
    }

    /// Point the client at another API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, TLS roots).
    #[must_use]
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Trade an authorization code for an access token.
    async fn authorize(&self, code: &str) -> Result<String, ProviderError> {
        let params = [
            ("code", code),
            ("app_id", self.app_id.as_str()),
            ("app_secret", self.app_secret.expose_secret()),
        ];

        let response = self
            .http_client
            .post(format!("{}/authorize", self.base_url))
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let body: AuthorizeResponse = read_json(response).await?;
        if !body.success {
            return Err(rejected(body.error));
        }

        body.access_token.ok_or_else(|| {
            ProviderError::MalformedResponse("authorize response has no access_token".to_string())
        })
    }

    /// Fetch the identity behind an access token.
    async fn fetch_info(&self, access_token: &str) -> Result<ClefUser, ProviderError> {
        let response = self
            .http_client
            .get(format!("{}/info", self.base_url))
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let body: InfoResponse = read_json(response).await?;
        if !body.success {
            return Err(rejected(body.error));
        }

        let mut info = body.info.ok_or_else(|| {
            ProviderError::MalformedResponse("info response has no info object".to_string())
        })?;

        let id = info
            .remove("id")
            .as_ref()
            .and_then(user_id_from_value)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("info object has no usable id".to_string())
            })?;

        Ok(ClefUser {
            id,
            attributes: info,
        })
    }
}

impl ClefClient for ClefApiClient {
    async fn exchange_login_code(&self, code: &str) -> Result<ClefUser, ProviderError> {
        let access_token = self.authorize(code).await?;
        let user = self.fetch_info(&access_token).await?;

        tracing::debug!(user_id = %user.id, "Clef login code exchanged");
        Ok(user)
    }

    async fn exchange_logout_token(&self, logout_token: &str) -> Result<UserId, ProviderError> {
        let params = [
            ("logout_token", logout_token),
            ("app_id", self.app_id.as_str()),
            ("app_secret", self.app_secret.expose_secret()),
        ];

        let response = self
            .http_client
            .post(format!("{}/logout", self.base_url))
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let body: LogoutResponse = read_json(response).await?;
        if !body.success {
            return Err(rejected(body.error));
        }

        let user_id = body
            .clef_id
            .as_ref()
            .and_then(user_id_from_value)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("logout response has no clef_id".to_string())
            })?;

        tracing::debug!(user_id = %user_id, "Clef logout token exchanged");
        Ok(user_id)
    }
}

/// Decode a Clef response body, turning HTTP errors into rejections.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let status = response.status();

    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&error_body)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or(error_body);
        return Err(ProviderError::Rejected(format!("HTTP {status}: {message}")));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}

fn rejected(error: Option<String>) -> ProviderError {
    ProviderError::Rejected(error.unwrap_or_else(|| "unspecified error".to_string()))
}

/// Clef sends ids as JSON numbers; accept strings too.
fn user_id_from_value(value: &Value) -> Option<UserId> {
    match value {
        Value::String(id) if !id.is_empty() => Some(UserId(id.clone())),
        Value::Number(id) => Some(UserId(id.to_string())),
        _ => None,
    }
}

/// `POST /authorize` response.
#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    #[serde(default)]
    success: bool,
    access_token: Option<String>,
    error: Option<String>,
}

/// `GET /info` response.
#[derive(Debug, Deserialize)]
struct InfoResponse {
    #[serde(default)]
    success: bool,
    info: Option<Map<String, Value>>,
    error: Option<String>,
}

/// `POST /logout` response.
#[derive(Debug, Deserialize)]
struct LogoutResponse {
    #[serde(default)]
    success: bool,
    clef_id: Option<Value>,
    error: Option<String>,
}

/// Error body on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}
