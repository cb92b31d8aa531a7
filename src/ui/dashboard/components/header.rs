//! Dashboard header component
//!
//! Renders the title and the refresh gauge

use super::super::state::DashboardState;
use crate::events::CycleState;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Render header with title and refresh progress.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let title_color = if state.model.all_online {
        Color::Cyan
    } else {
        Color::LightYellow
    };

    let title = Paragraph::new(format!("TRADE PULSE v{}", version))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    // A running cycle takes priority over the countdown
    let (progress_text, gauge_color, progress_percent) = match state.cycle_state() {
        CycleState::Refreshing => {
            // Loops every 20 ticks
            let progress = ((state.tick % 20) as f64 / 20.0 * 100.0) as u16;
            (
                format!("REFRESHING - Fetching {} sources", state.model.sources.len()),
                Color::LightGreen,
                progress,
            )
        }
        CycleState::Idle => match state.next_refresh_in() {
            Some(remaining) if !remaining.is_zero() => (
                format!("IDLE - Next refresh in {}s", remaining.as_secs()),
                Color::LightBlue,
                state.countdown_percent(),
            ),
            Some(_) => ("IDLE - Refresh due".to_string(), Color::LightBlue, 100),
            None => (
                "WAITING - First refresh pending".to_string(),
                Color::DarkGray,
                0,
            ),
        },
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(
            Style::default()
                .fg(gauge_color)
                .add_modifier(Modifier::BOLD),
        )
        .percent(progress_percent.min(100))
        .label(progress_text);

    f.render_widget(gauge, header_chunks[1]);
}
