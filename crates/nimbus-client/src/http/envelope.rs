//! The `{success, message, data}` wrapper around every JSON body.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;

/// Response envelope used by the drive API.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the server handled the request.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Human-readable status text.
    #[serde(default)]
    pub message: Option<String>,
    /// The payload. A missing field decodes as `None`.
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    /// Return the payload, turning `success: false` into a server error.
    pub fn into_data(self) -> AppResult<T> {
        if !self.success {
            return Err(AppError::server(
                self.message.unwrap_or_else(|| "Request failed".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| AppError::server("Response carried no data"))
    }

    /// Check the flag only; the payload is ignored.
    pub fn into_unit(self) -> AppResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(AppError::server(
                self.message.unwrap_or_else(|| "Request failed".to_string()),
            ))
        }
    }
}

/// Decode an enveloped body.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)?;
    envelope.into_data()
}

/// Pull the most useful message out of an error body.
///
/// Error bodies are either the envelope, a Spring error object
/// (`{error, message, status}`) or plain text.
pub fn error_message(body: &str, fallback: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        error: Option<String>,
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(parsed) => parsed
            .message
            .filter(|m| !m.is_empty())
            .or(parsed.error)
            .unwrap_or_else(|| fallback.to_string()),
        Err(_) => trimmed.chars().take(200).collect(),
    }
}
