//! Per-source cache slots and their status

use crate::sources::Payload;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum SourceHealth {
    /// No cycle has finished yet.
    Pending,
    /// The last cycle stored live data.
    Online,
    /// The last cycle stored the fallback payload.
    Offline,
}

/// Status of one source as shown to presentation code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStatus {
    pub name: String,
    pub health: SourceHealth,
    /// Last time the cache slot was written, live or fallback.
    pub updated_at: Option<DateTime<Utc>>,
    /// Last time live data was stored.
    pub last_live_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

impl SourceStatus {
    pub fn is_live(&self) -> bool {
        self.health == SourceHealth::Online
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    payload: Option<Payload>,
    status: SourceStatus,
}

impl CacheEntry {
    fn empty(name: &str) -> Self {
        Self {
            payload: None,
            status: SourceStatus {
                name: name.to_string(),
                health: SourceHealth::Pending,
                updated_at: None,
                last_live_at: None,
                last_error: None,
                consecutive_failures: 0,
            },
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn status(&self) -> &SourceStatus {
        &self.status
    }
}

/// Single-slot cache keyed by source name. No eviction; every write overwrites.
#[derive(Debug, Default)]
pub struct Cache {
    entries: HashMap<String, CacheEntry>,
}

impl Cache {
    /// Creates one empty slot per source name.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            entries: names
                .into_iter()
                .map(|name| (name.to_string(), CacheEntry::empty(name)))
                .collect(),
        }
    }

    fn slot(&mut self, name: &str) -> &mut CacheEntry {
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| CacheEntry::empty(name))
    }

    pub fn record_live(&mut self, name: &str, payload: Payload, now: DateTime<Utc>) {
        let entry = self.slot(name);
        entry.payload = Some(payload);
        entry.status.health = SourceHealth::Online;
        entry.status.updated_at = Some(now);
        entry.status.last_live_at = Some(now);
        entry.status.last_error = None;
        entry.status.consecutive_failures = 0;
    }

    pub fn record_fallback(
        &mut self,
        name: &str,
        payload: Payload,
        reason: String,
        now: DateTime<Utc>,
    ) {
        let entry = self.slot(name);
        entry.payload = Some(payload);
        entry.status.health = SourceHealth::Offline;
        entry.status.updated_at = Some(now);
        entry.status.last_error = Some(reason);
        entry.status.consecutive_failures += 1;
    }

    pub fn get(&self, name: &str) -> Option<&CacheEntry> {
        self.entries.get(name)
    }
}
