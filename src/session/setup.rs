//! Session setup and initialization

use crate::config::Config;
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::environment::Environment;
use crate::events::Event;
use crate::network::HttpClient;
use crate::refresh::{EventSender, RefreshConfig, RefreshCoordinator};
use crate::sources::default_sources;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Shared handle to the refresh coordinator
    pub coordinator: RefreshCoordinator,
    /// Event receiver for coordinator events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Environment the sources were resolved against
    pub environment: Environment,
}

/// Builds the HTTP client, the source catalog and the coordinator.
///
/// Nothing is fetched yet; callers decide when to run the first cycle.
///
/// # Arguments
/// * `config` - Resolved configuration, CLI overrides already applied
/// * `env` - Environment to resolve source URLs against
/// * `with_events` - Whether coordinator events should be delivered
pub fn setup_session(
    config: &Config,
    env: Environment,
    with_events: bool,
) -> Result<SessionData, Box<dyn Error>> {
    let refresh_config = RefreshConfig::from_config(config);
    let client = HttpClient::new(refresh_config.fetch_timeout)?;
    let sources = default_sources(&env, config, Arc::new(client));

    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let events = if with_events {
        EventSender::new(event_sender)
    } else {
        EventSender::disabled()
    };

    let coordinator = RefreshCoordinator::new(sources, refresh_config, events);
    log::debug!(
        "Session set up in {} with sources [{}] (interval {}s, timeout {}s)",
        env,
        coordinator.source_names().join(", "),
        refresh_config.interval.as_secs(),
        refresh_config.fetch_timeout.as_secs()
    );

    Ok(SessionData {
        coordinator,
        event_receiver,
        environment: env,
    })
}
