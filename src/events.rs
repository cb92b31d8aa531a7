//! Event System
//!
//! Types and implementations for coordinator events and logging

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Origin {
    /// The refresh coordinator itself (cycles, timer).
    Coordinator,
    /// One named data source.
    Source(String),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Waiting,
    /// The timer started or ticked; the next tick is one interval away.
    Scheduled,
    StateChange,
}

/// Whether a refresh cycle is running
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum CycleState {
    /// Fetches are in flight
    Refreshing,
    /// Waiting for the next tick or a manual refresh
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub origin: Origin,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    /// Optional state information for state change events
    pub cycle_state: Option<CycleState>,
}

impl Event {
    fn new(origin: Origin, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            origin,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            cycle_state: None,
        }
    }

    pub fn state_change(state: CycleState, msg: String) -> Self {
        Self {
            cycle_state: Some(state),
            ..Self::new(
                Origin::Coordinator,
                msg,
                EventType::StateChange,
                LogLevel::Info,
            )
        }
    }

    pub fn coordinator_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Origin::Coordinator, msg, event_type, log_level)
    }

    pub fn source_with_level(
        source: &str,
        msg: String,
        event_type: EventType,
        log_level: LogLevel,
    ) -> Self {
        Self::new(
            Origin::Source(source.to_string()),
            msg,
            event_type,
            log_level,
        )
    }

    pub fn should_display(&self) -> bool {
        // StateChange events drive the header, not the log
        if self.event_type == EventType::StateChange {
            return false;
        }
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.origin {
            Origin::Coordinator => {
                write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
            }
            Origin::Source(name) => write!(
                f,
                "{} [{}] {}: {}",
                self.event_type, self.timestamp, name, self.msg
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_changes_are_not_displayed() {
        let event = Event::state_change(CycleState::Refreshing, "Refreshing".to_string());
        assert_eq!(event.cycle_state, Some(CycleState::Refreshing));
        assert!(!event.should_display());
    }

    #[test]
    fn test_display_includes_source_name() {
        let event = Event::source_with_level(
            "trade",
            "live data".to_string(),
            EventType::Success,
            LogLevel::Info,
        );
        assert!(event.should_display());
        let text = event.to_string();
        assert!(text.starts_with("Success ["));
        assert!(text.ends_with("trade: live data"));
    }

    #[test]
    fn test_tick_events_are_hidden_below_info() {
        let tick = Event::coordinator_with_level(
            "Timer tick".to_string(),
            EventType::Scheduled,
            LogLevel::Debug,
        );
        assert_eq!(tick.should_display(), should_log_with_env(LogLevel::Debug));
    }
}
