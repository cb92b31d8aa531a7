//! TUI mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown},
};
use crate::events::Event;
use crate::refresh::RefreshCoordinator;
use crate::ui::{self, UIConfig};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs the dashboard in the terminal
///
/// The first cycle is started in the background so the dashboard comes up
/// immediately and fills in as sources settle.
pub async fn run_tui_mode(
    session: SessionData,
    with_background: bool,
) -> Result<(), Box<dyn Error>> {
    let coordinator = session.coordinator.clone();
    let init = tokio::spawn(async move {
        coordinator.initialize().await;
    });

    let ui_config = UIConfig::new(with_background, session.environment.clone());
    let result = run_dashboard(
        session.coordinator.clone(),
        session.event_receiver,
        ui_config,
    )
    .await;

    finish_session(&session.coordinator, init, result).await
}

async fn run_dashboard(
    coordinator: RefreshCoordinator,
    event_receiver: mpsc::Receiver<Event>,
    ui_config: UIConfig,
) -> Result<(), Box<dyn Error>> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = ui::App::new(coordinator, event_receiver, ui_config);
    let result = ui::run(&mut terminal, app).await;

    // Clean up the terminal after running the application
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(result?)
}

/// Stops the coordinator before reporting how the dashboard ended, so a
/// failed UI never leaves the timer or in-flight fetches running.
async fn finish_session(
    coordinator: &RefreshCoordinator,
    init: JoinHandle<()>,
    result: Result<(), Box<dyn Error>>,
) -> Result<(), Box<dyn Error>> {
    print_session_shutdown();
    coordinator.dispose().await;
    let _ = init.await;
    result?;
    print_session_exit_success();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::{EventSender, RefreshConfig};

    #[tokio::test(start_paused = true)]
    async fn test_failed_dashboard_still_disposes() {
        let coordinator =
            RefreshCoordinator::new(Vec::new(), RefreshConfig::default(), EventSender::disabled());
        coordinator.start_auto_refresh().await;
        assert!(coordinator.is_auto_refreshing().await);

        let init = tokio::spawn(async {});
        let result = finish_session(&coordinator, init, Err("terminal lost".into())).await;

        assert_eq!(result.unwrap_err().to_string(), "terminal lost");
        assert!(!coordinator.is_auto_refreshing().await);
    }
}
