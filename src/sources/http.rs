//! HTTP-backed data source

use super::normalize::ResponseFormat;
use super::{DataSource, Payload};
use crate::network::{FetchError, JsonFetcher};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A provider reached over HTTP whose JSON answer is normalized by `format`.
pub struct HttpSource {
    name: String,
    label: String,
    url: Option<String>,
    format: ResponseFormat,
    fallback: Payload,
    fetcher: Arc<dyn JsonFetcher>,
}

impl HttpSource {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        url: Option<String>,
        format: ResponseFormat,
        fallback: Payload,
        fetcher: Arc<dyn JsonFetcher>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            url,
            format,
            fallback,
            fetcher,
        }
    }
}

#[async_trait::async_trait]
impl DataSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    async fn fetch(&self, cancel: &CancellationToken) -> Result<Payload, FetchError> {
        let url = self.url.as_deref().ok_or(FetchError::NotConfigured)?;
        let body = self.fetcher.fetch_json(url, cancel).await?;
        self.format.normalize(&body)
    }

    fn fallback(&self) -> Payload {
        self.fallback.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::MockJsonFetcher;
    use serde_json::json;

    fn port_format() -> ResponseFormat {
        ResponseFormat::FlatRecords {
            fields: vec!["teu".to_string()],
        }
    }

    fn fallback() -> Payload {
        Payload::new(Some("2024-01".to_string())).with_metric("teu", 1.0)
    }

    #[tokio::test]
    async fn test_fetch_normalizes_body() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_fetch_json()
            .withf(|url, _| url == "http://localhost/port")
            .times(1)
            .returning(|_, _| Ok(json!({"data": [{"period": "2024-06", "teu": 980.0}]})));

        let source = HttpSource::new(
            "port",
            "Port Throughput",
            Some("http://localhost/port".to_string()),
            port_format(),
            fallback(),
            Arc::new(fetcher),
        );

        let payload = source.fetch(&CancellationToken::new()).await.unwrap();
        assert_eq!(payload.metric("teu"), Some(980.0));
        assert_eq!(payload.period.as_deref(), Some("2024-06"));
        assert_eq!(source.label(), "Port Throughput");
    }

    #[tokio::test]
    async fn test_fetch_passes_through_transport_errors() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher.expect_fetch_json().returning(|_, _| {
            Err(FetchError::Http {
                status: 500,
                message: "boom".to_string(),
            })
        });

        let source = HttpSource::new(
            "port",
            "Port Throughput",
            Some("http://localhost/port".to_string()),
            port_format(),
            fallback(),
            Arc::new(fetcher),
        );

        let err = source.fetch(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 500, .. }));
        assert_eq!(source.fallback(), fallback());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_error() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher
            .expect_fetch_json()
            .returning(|_, _| Ok(json!({"data": [{"name": "North"}]})));

        let source = HttpSource::new(
            "port",
            "Port Throughput",
            Some("http://localhost/port".to_string()),
            port_format(),
            fallback(),
            Arc::new(fetcher),
        );

        let err = source.fetch(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::Shape(_)));
    }

    #[tokio::test]
    // A source without an endpoint never touches the network.
    async fn test_missing_url_fails_without_request() {
        let mut fetcher = MockJsonFetcher::new();
        fetcher.expect_fetch_json().never();

        let source = HttpSource::new(
            "port",
            "Port Throughput",
            None,
            port_format(),
            fallback(),
            Arc::new(fetcher),
        );

        let err = source.fetch(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::NotConfigured));
    }
}
