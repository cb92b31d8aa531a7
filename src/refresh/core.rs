//! Coordinator configuration and event plumbing

use crate::config::Config;
use crate::consts::cli_consts::{fetching, refresh};
use crate::events::{CycleState, Event, EventType};
use crate::logging::LogLevel;
use std::time::Duration;
use tokio::sync::mpsc;

/// Event sending utilities for the coordinator.
///
/// Sends never wait: a refresh cycle must not stall behind a slow front end,
/// so events are dropped when the queue is full or nobody is listening.
#[derive(Clone, Default)]
pub struct EventSender {
    sender: Option<mpsc::Sender<Event>>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// A sender that discards everything, for callers without a front end.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Send a generic event
    pub fn send_event(&self, event: Event) {
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(event);
        }
    }

    pub fn send_state(&self, state: CycleState, message: String) {
        self.send_event(Event::state_change(state, message));
    }

    pub fn send_coordinator_event(
        &self,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::coordinator_with_level(
            message, event_type, log_level,
        ));
    }

    pub fn send_source_event(
        &self,
        source: &str,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::source_with_level(
            source, message, event_type, log_level,
        ));
    }
}

/// Timing configuration shared by the coordinator and its timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Period of the automatic refresh timer
    pub interval: Duration,
    /// Upper bound on a single source fetch
    pub fetch_timeout: Duration,
}

impl RefreshConfig {
    pub fn new(interval: Duration, fetch_timeout: Duration) -> Self {
        Self {
            interval,
            fetch_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.refresh_interval(), config.fetch_timeout())
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new(refresh::refresh_interval(), fetching::fetch_timeout())
    }
}
