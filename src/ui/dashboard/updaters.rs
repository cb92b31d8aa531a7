//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from events

use super::state::DashboardState;

use crate::events::{Event as CoordinatorEvent, EventType, Origin};

use std::time::{Duration, Instant};

impl DashboardState {
    /// Advance the animation tick and drain queued events.
    pub fn update(&mut self) {
        self.tick += 1;

        while let Some(event) = self.pending_events.pop_front() {
            self.process_event(&event);
            self.add_to_activity_log(event);
        }
    }

    fn process_event(&mut self, event: &CoordinatorEvent) {
        match &event.origin {
            Origin::Coordinator => self.handle_coordinator_event(event),
            Origin::Source(_) => self.handle_source_event(event),
        }
    }

    /// Only the timer moves the countdown; a manual refresh leaves it alone.
    fn handle_coordinator_event(&mut self, event: &CoordinatorEvent) {
        match event.event_type {
            EventType::StateChange => {
                if let Some(state) = event.cycle_state {
                    self.set_cycle_state(state);
                }
            }
            EventType::Scheduled => self.set_countdown_anchor(Instant::now()),
            _ => {}
        }
    }

    fn handle_source_event(&mut self, event: &CoordinatorEvent) {
        match event.event_type {
            EventType::Success => self.live_fetches += 1,
            EventType::Error => self.fallback_fetches += 1,
            _ => {}
        }
    }

    /// Time left until the timer is expected to tick, if it is running.
    pub fn next_refresh_in(&self) -> Option<Duration> {
        let anchor = self.countdown_anchor()?;
        Some(self.interval.saturating_sub(anchor.elapsed()))
    }

    /// Share of the interval already elapsed, 0-100.
    pub fn countdown_percent(&self) -> u16 {
        match self.countdown_anchor() {
            Some(anchor) if !self.interval.is_zero() => {
                let ratio = anchor.elapsed().as_secs_f64() / self.interval.as_secs_f64();
                (ratio * 100.0).min(100.0) as u16
            }
            _ => 0,
        }
    }
}
