//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Origin;
use crate::refresh::SourceHealth;
use crate::sources::catalog::{ECONOMY, MARKET, PORT, TRADE};
use ratatui::prelude::Color;

/// Get a ratatui color for the origin of an event
pub fn get_origin_color(origin: &Origin) -> Color {
    match origin {
        Origin::Coordinator => Color::Cyan,
        Origin::Source(name) => match name.as_str() {
            TRADE => Color::Green,
            MARKET => Color::Yellow,
            ECONOMY => Color::Magenta,
            PORT => Color::LightBlue,
            _ => Color::White,
        },
    }
}

pub fn get_health_color(health: SourceHealth) -> Color {
    match health {
        SourceHealth::Online => Color::LightGreen,
        SourceHealth::Offline => Color::LightRed,
        SourceHealth::Pending => Color::DarkGray,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    if let Some((date_part, time_part)) = timestamp.split_once(' ') {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// Shorten fallback reasons that carry verbose transport errors
pub fn clean_fetch_error_message(msg: &str) -> String {
    if msg.contains("Reqwest error") && msg.contains("connect") {
        return "Unavailable, showing fallback data (connection failed)".to_string();
    }
    if msg.contains("Reqwest error") {
        return "Unavailable, showing fallback data (network error)".to_string();
    }
    msg.to_string()
}
