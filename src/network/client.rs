//! HTTP client for the statistics providers
//!
//! One shared reqwest client; every request is bounded by a fixed timeout and
//! can be abandoned through a cancellation token.

use super::JsonFetcher;
use super::error::FetchError;
use crate::consts::cli_consts::fetching;
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("trade-pulse/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .connect_timeout(fetching::connect_timeout().min(timeout))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, timeout })
    }

    async fn handle_response_status(response: Response) -> Result<Response, FetchError> {
        if !response.status().is_success() {
            return Err(FetchError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&response_bytes)?)
    }

    /// Issues one GET and parses the body as JSON.
    ///
    /// Fails with `Timeout` when nothing arrives within the configured timeout,
    /// `Http` on a non-success status, `Decode` on a body that is not JSON, and
    /// `Cancelled` when `cancel` fires first.
    pub async fn fetch_with_timeout(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, FetchError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.get_json(url)) => match result {
                Ok(body) => body,
                Err(_) => Err(FetchError::Timeout(self.timeout)),
            },
        }
    }
}

#[async_trait::async_trait]
impl JsonFetcher for HttpClient {
    async fn fetch_json(&self, url: &str, cancel: &CancellationToken) -> Result<Value, FetchError> {
        self.fetch_with_timeout(url, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `response` verbatim to every connection. `None` accepts and never answers.
    async fn serve(response: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    match response {
                        Some(body) => {
                            let _ = socket.write_all(body.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        }
                        None => tokio::time::sleep(Duration::from_secs(30)).await,
                    }
                });
            }
        });
        format!("http://{}/data", addr)
    }

    fn http_response(status_line: &str, body: &str) -> &'static str {
        let text = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        Box::leak(text.into_boxed_str())
    }

    #[tokio::test]
    async fn test_successful_fetch_parses_json() {
        let url = serve(Some(http_response("200 OK", r#"{"teu": 1250.5}"#))).await;
        let client = HttpClient::new(Duration::from_secs(5)).unwrap();

        let body = client
            .fetch_with_timeout(&url, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(body["teu"], 1250.5);
    }

    #[tokio::test]
    async fn test_non_success_status_is_failure() {
        let url = serve(Some(http_response("503 Service Unavailable", "down"))).await;
        let client = HttpClient::new(Duration::from_secs(5)).unwrap();

        let err = client
            .fetch_with_timeout(&url, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_failure() {
        let url = serve(Some(http_response("200 OK", "<html>oops</html>"))).await;
        let client = HttpClient::new(Duration::from_secs(5)).unwrap();

        let err = client
            .fetch_with_timeout(&url, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let url = serve(None).await;
        let client = HttpClient::new(Duration::from_millis(200)).unwrap();

        let err = client
            .fetch_with_timeout(&url, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_request() {
        let url = serve(None).await;
        let client = HttpClient::new(Duration::from_secs(30)).unwrap();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = client.fetch_with_timeout(&url, &cancel).await.unwrap_err();
        assert!(matches!(err, FetchError::Cancelled));
    }
}
