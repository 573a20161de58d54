/*
[INPUT]:  Error sources (HTTP, API envelope, crypto, serialization)
[OUTPUT]: Structured error types with context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Lighter adapter
#[derive(Error, Debug)]
pub enum LighterError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error envelope
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error (bad key material, bad indices)
    #[error("Configuration error: {0}")]
    Config(String),

    /// API key generation failed
    #[error("Key generation failed: {0}")]
    KeyGen(String),

    /// Wallet signing failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The exchange reports a different key bound to the slot
    #[error("Registered API key mismatch: expected {expected}, exchange has {actual}")]
    KeyMismatch { expected: String, actual: String },
}

impl LighterError {
    /// Check whether an API fault reports the L1 address as unknown.
    ///
    /// The exchange signals absence through the fault message rather than a
    /// dedicated code, so the match is on the message text.
    pub fn is_account_not_found(&self) -> bool {
        matches!(
            self,
            LighterError::Api { message, .. }
                if message.to_ascii_lowercase().contains("account not found")
        )
    }

    /// Check if the error originates from the exchange rather than transport
    pub fn is_api_fault(&self) -> bool {
        matches!(self, LighterError::Api { .. })
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        LighterError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }
}

/// Result type alias for Lighter operations
pub type Result<T> = std::result::Result<T, LighterError>;
