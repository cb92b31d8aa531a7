//! Start and stop banners for the long-running modes

use crate::cli_messages::{Tag, print_line};
use crate::environment::Environment;

pub fn print_session_starting(mode: &str, env: &Environment, interval_secs: u64) {
    print_line(
        Tag::Info,
        &format!("Starting {} mode", mode),
        &format!("{} sources, refresh every {}s, Ctrl+C to stop", env, interval_secs),
    );
}

pub fn print_session_shutdown() {
    print_line(Tag::Info, "Shutting down...", "");
}

pub fn print_session_exit_success() {
    print_line(Tag::Success, "trade-pulse exited successfully", "");
}
