//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::logging::init_logger;
use std::error::Error;

/// Runs the coordinator without a terminal UI
///
/// This function handles:
/// 1. Console event logging
/// 2. The first refresh and the periodic timer
/// 3. Ctrl+C shutdown handling
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    init_logger();
    print_session_starting(
        "headless",
        &session.environment,
        session.coordinator.config().interval.as_secs(),
    );

    let coordinator = session.coordinator.clone();
    let init = tokio::spawn(async move {
        coordinator.initialize().await;
    });

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    // Event loop: print events to console until Ctrl+C
    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                if event.should_display() {
                    println!("{}", event);
                }
            }
            _ = &mut ctrl_c => {
                break;
            }
        }
    }

    print_session_shutdown();
    session.coordinator.dispose().await;
    let _ = init.await;
    print_session_exit_success();

    Ok(())
}
