use tokio_util::sync::CancellationToken;

pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::FetchError;

#[cfg(test)]
use mockall::automock;

/// Anything that can GET a URL and hand back its JSON body.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetch `url` and parse the body as JSON, giving up when `cancel` fires.
    async fn fetch_json(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value, FetchError>;
}
