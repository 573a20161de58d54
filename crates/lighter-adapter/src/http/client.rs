/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::http::{LighterError, Result};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Fault envelope the exchange returns on any API-level error
#[derive(Debug, Deserialize)]
struct ApiFault {
    code: i32,
    #[serde(default)]
    message: Option<String>,
}

/// Main HTTP client for the Lighter REST API
#[derive(Debug, Clone)]
pub struct LighterClient {
    http_client: Client,
    base_url: Url,
}

impl LighterClient {
    /// Create a new client for the given endpoint with default configuration
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(LighterError::Http)?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// The endpoint this client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a request builder for the given endpoint path
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode the JSON response.
    ///
    /// Non-2xx statuses and 2xx bodies whose `code` field is not 200 are both
    /// surfaced as [`LighterError::Api`]; a body that decodes as neither a
    /// fault envelope nor `T` is an [`LighterError::InvalidResponse`].
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(fault) = serde_json::from_str::<ApiFault>(&body) {
                return Err(LighterError::Api {
                    code: fault.code,
                    message: fault.message.unwrap_or_else(|| status.to_string()),
                });
            }
            return Err(LighterError::api_error(status, body));
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| LighterError::InvalidResponse(format!("not JSON: {e}")))?;

        if let Some(code) = value.get("code").and_then(|c| c.as_i64()) {
            if code != 200 {
                let message = value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unspecified API fault")
                    .to_string();
                return Err(LighterError::Api {
                    code: code as i32,
                    message,
                });
            }
        }

        serde_json::from_value(value)
            .map_err(|e| LighterError::InvalidResponse(format!("unexpected shape: {e}")))
    }
}
