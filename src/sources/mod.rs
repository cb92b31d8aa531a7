//! Data sources
//!
//! A source is anything with a name, a way to fetch a fresh [`Payload`] and a
//! static fallback payload. The refresh coordinator treats them all alike.

use crate::network::FetchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

pub mod catalog;
pub mod http;
pub mod normalize;

pub use catalog::default_sources;
pub use http::HttpSource;
pub use normalize::ResponseFormat;

/// Normalized statistics from one provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Reporting period the values describe, e.g. `2023` or `2024-Q3`.
    pub period: Option<String>,
    pub metrics: BTreeMap<String, f64>,
}

impl Payload {
    pub fn new(period: Option<String>) -> Self {
        Self {
            period,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }
}

#[cfg(test)]
impl Payload {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Stable identifier, used as the cache key.
    fn name(&self) -> &str;

    /// Human-readable name for dashboards and reports.
    fn label(&self) -> &str {
        self.name()
    }

    /// Fetch fresh data. Implementations should return promptly once `cancel` fires.
    async fn fetch(&self, cancel: &CancellationToken) -> Result<Payload, FetchError>;

    /// Data to show when `fetch` fails.
    fn fallback(&self) -> Payload;
}
