//! Error taxonomy shared by both retrieval channels.

use thiserror::Error;

/// All failures a retrieval channel can produce.
///
/// Every variant is caught at the channel boundary by the orchestrator;
/// none of them escape as a panic. A primary-channel error triggers the
/// fallback, a fallback-channel error is terminal for the invocation.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The browser could not be launched, a session could not be opened,
    /// or in-page script evaluation failed.
    #[error("browser unavailable: {0}")]
    Browser(String),

    /// Navigation failed or timed out.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// The endpoint answered with something other than HTTP 200, or no
    /// response was observed at all (`"no response"`).
    #[error("HTTP {0}")]
    Status(String),

    /// Transport-level failure on the direct HTTP channel.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON shape we expected.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}
