//! Display model
//!
//! The aggregate view handed to dashboards and reports, rebuilt once per
//! refresh cycle from the cache.

use crate::refresh::cache::{Cache, SourceHealth, SourceStatus};
use crate::sources::{DataSource, Payload};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceView {
    pub label: String,
    #[serde(flatten)]
    pub status: SourceStatus,
    pub payload: Option<Payload>,
}

impl SourceView {
    pub fn name(&self) -> &str {
        &self.status.name
    }

    pub fn health(&self) -> SourceHealth {
        self.status.health
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    /// Number of the cycle this model was built from; 0 before the first cycle.
    pub cycle: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub all_online: bool,
    pub online_count: usize,
    pub sources: Vec<SourceView>,
}

impl DisplayModel {
    pub fn build(
        cycle: u64,
        refreshed_at: Option<DateTime<Utc>>,
        sources: &[Arc<dyn DataSource>],
        cache: &Cache,
    ) -> Self {
        let views: Vec<SourceView> = sources
            .iter()
            .filter_map(|source| {
                let entry = cache.get(source.name())?;
                Some(SourceView {
                    label: source.label().to_string(),
                    status: entry.status().clone(),
                    payload: entry.payload().cloned(),
                })
            })
            .collect();

        let online_count = views
            .iter()
            .filter(|v| v.health() == SourceHealth::Online)
            .count();

        Self {
            cycle,
            refreshed_at,
            all_online: !views.is_empty() && online_count == views.len(),
            online_count,
            sources: views,
        }
    }

    pub fn source(&self, name: &str) -> Option<&SourceView> {
        self.sources.iter().find(|v| v.name() == name)
    }

    /// True once every source has a payload to show.
    pub fn is_populated(&self) -> bool {
        self.sources.iter().all(|v| v.payload.is_some())
    }

    /// One-line summary, e.g. `3/4 sources live`.
    pub fn headline(&self) -> String {
        if self.cycle == 0 {
            return "Waiting for first refresh".to_string();
        }
        if self.all_online {
            format!("All {} sources live", self.sources.len())
        } else {
            format!(
                "{}/{} sources live, {} on fallback data",
                self.online_count,
                self.sources.len(),
                self.sources.len() - self.online_count
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::FetchError;
    use tokio_util::sync::CancellationToken;

    struct Fixed(&'static str);

    #[async_trait::async_trait]
    impl DataSource for Fixed {
        fn name(&self) -> &str {
            self.0
        }
        async fn fetch(&self, _cancel: &CancellationToken) -> Result<Payload, FetchError> {
            Ok(self.fallback())
        }
        fn fallback(&self) -> Payload {
            Payload::new(None).with_metric("v", 1.0)
        }
    }

    fn sources() -> Vec<Arc<dyn DataSource>> {
        vec![Arc::new(Fixed("trade")), Arc::new(Fixed("port"))]
    }

    #[test]
    fn test_empty_cache_model() {
        let sources = sources();
        let cache = Cache::new(sources.iter().map(|s| s.name()));
        let model = DisplayModel::build(0, None, &sources, &cache);

        assert_eq!(model.sources.len(), 2);
        assert!(!model.all_online);
        assert!(!model.is_populated());
        assert_eq!(model.headline(), "Waiting for first refresh");
    }

    #[test]
    fn test_mixed_health_model() {
        let sources = sources();
        let mut cache = Cache::new(sources.iter().map(|s| s.name()));
        let now = Utc::now();
        cache.record_live("trade", Payload::new(None).with_metric("v", 2.0), now);
        cache.record_fallback("port", sources[1].fallback(), "timeout".to_string(), now);

        let model = DisplayModel::build(1, Some(now), &sources, &cache);
        assert_eq!(model.online_count, 1);
        assert!(!model.all_online);
        assert!(model.is_populated());
        assert_eq!(model.source("port").unwrap().health(), SourceHealth::Offline);
        assert_eq!(model.headline(), "1/2 sources live, 1 on fallback data");
    }
}
