//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::display::DisplayModel;
use crate::environment::Environment;
use crate::events::Event as CoordinatorEvent;
use crate::refresh::RefreshCoordinator;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crossterm::event::{self, Event, KeyCode};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub environment: Environment,
}

impl UIConfig {
    pub fn new(with_background_color: bool, environment: Environment) -> Self {
        Self {
            with_background_color,
            environment,
        }
    }
}

/// Application state
pub struct App {
    /// Handle used for manual refreshes.
    coordinator: RefreshCoordinator,

    /// Receives events from the coordinator.
    event_receiver: mpsc::Receiver<CoordinatorEvent>,

    /// Receives a new display model after every cycle.
    display_receiver: watch::Receiver<DisplayModel>,

    dashboard: DashboardState,
}

impl App {
    pub fn new(
        coordinator: RefreshCoordinator,
        event_receiver: mpsc::Receiver<CoordinatorEvent>,
        ui_config: UIConfig,
    ) -> Self {
        let display_receiver = coordinator.subscribe();
        let dashboard = DashboardState::new(
            Instant::now(),
            coordinator.config().interval,
            display_receiver.borrow().clone(),
            ui_config,
        );
        Self {
            coordinator,
            event_receiver,
            display_receiver,
            dashboard,
        }
    }

    /// Starts a cycle without blocking the UI; a cycle already running wins.
    fn request_refresh(&self) {
        let coordinator = self.coordinator.clone();
        tokio::spawn(async move {
            coordinator.refresh_all_data().await;
        });
    }
}

/// Runs the dashboard in a loop, handling events and redrawing.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    loop {
        // Queue all incoming events for processing
        while let Ok(event) = app.event_receiver.try_recv() {
            app.dashboard.add_event(event);
        }

        if app.display_receiver.has_changed().unwrap_or(false) {
            let model = app.display_receiver.borrow_and_update().clone();
            app.dashboard.set_model(model);
        }

        app.dashboard.update();
        terminal.draw(|f| render_dashboard(f, &app.dashboard))?;

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('r') => app.request_refresh(),
                    _ => {}
                }
            }
        }
    }
}
