//! Dashboard state management
//!
//! Contains the main dashboard state struct

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::display::DisplayModel;
use crate::environment::Environment;
use crate::events::{CycleState, Event as CoordinatorEvent};
use crate::ui::app::UIConfig;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Dashboard state fed by coordinator events and display models.
#[derive(Debug)]
pub struct DashboardState {
    /// The environment the sources were resolved against.
    pub environment: Environment,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Period of the automatic refresh timer.
    pub interval: Duration,
    /// Latest published display model.
    pub model: DisplayModel,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<CoordinatorEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<CoordinatorEvent>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,
    /// Live fetches seen since start
    pub live_fetches: u64,
    /// Fetches that fell back since start
    pub fallback_fetches: u64,

    cycle_state: CycleState,
    /// When the refresh timer last ticked or was started
    countdown_anchor: Option<Instant>,
}

impl DashboardState {
    pub fn new(
        start_time: Instant,
        interval: Duration,
        model: DisplayModel,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            environment: ui_config.environment,
            start_time,
            interval,
            model,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color: ui_config.with_background_color,
            tick: 0,
            live_fetches: 0,
            fallback_fetches: 0,
            cycle_state: CycleState::Idle,
            countdown_anchor: None,
        }
    }

    pub fn cycle_state(&self) -> CycleState {
        self.cycle_state
    }

    pub fn set_cycle_state(&mut self, state: CycleState) {
        self.cycle_state = state;
    }

    pub fn countdown_anchor(&self) -> Option<Instant> {
        self.countdown_anchor
    }

    pub fn set_countdown_anchor(&mut self, at: Instant) {
        self.countdown_anchor = Some(at);
    }

    pub fn set_model(&mut self, model: DisplayModel) {
        self.model = model;
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: CoordinatorEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: CoordinatorEvent) {
        self.pending_events.push_back(event);
    }
}
