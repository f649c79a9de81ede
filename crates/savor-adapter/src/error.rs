//! Per-call adapter failures.

/// A failed structured-extraction call.
///
/// These never escape the engine's entry points; they are turned into an
/// [`AdapterOutcome::Failed`](crate::AdapterOutcome::Failed) and trigger the
/// rule-based fallback for that document.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Adapter unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for AdapterError {
    fn from(e: serde_json::Error) -> Self {
        AdapterError::MalformedResponse(e.to_string())
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for AdapterError {
    fn from(e: reqwest::Error) -> Self {
        AdapterError::Http(e.to_string())
    }
}

impl From<AdapterError> for savor_core::Error {
    fn from(e: AdapterError) -> Self {
        savor_core::Error::Adapter(e.to_string())
    }
}
