//! Error handling for outbound statistics requests

use crate::consts::cli_consts::fetching::MAX_ERROR_BODY_CHARS;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Network(#[from] reqwest::Error),

    /// No response arrived within the allowed time.
    #[error("No response within {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// The provider answered with a non-success status code.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body was JSON but not in the shape the provider normally returns.
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    /// The source has no endpoint to ask.
    #[error("No endpoint configured")]
    NotConfigured,

    /// The request was abandoned because the coordinator shut down.
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    pub async fn from_response(response: reqwest::Response) -> FetchError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        FetchError::Http {
            status,
            message: message.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }

    pub fn shape(msg: impl Into<String>) -> FetchError {
        FetchError::Shape(msg.into())
    }
}
