//! Dashboard sources panel component
//!
//! One block per data source: health, period and latest figures

use super::super::state::DashboardState;
use super::super::utils::get_health_color;
use crate::environment::Environment;
use crate::report::format_metric;
use chrono::Local;
use ratatui::Frame;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

fn uptime_string(secs: u64) -> String {
    if secs >= 86400 {
        format!(
            "Uptime: {}d {}h {}m",
            secs / 86400,
            (secs % 86400) / 3600,
            (secs % 3600) / 60
        )
    } else if secs >= 3600 {
        format!("Uptime: {}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else {
        format!("Uptime: {}m {}s", secs / 60, secs % 60)
    }
}

pub fn render_sources_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let mut lines = Vec::new();

    let env_color = match state.environment {
        Environment::Production => Color::Green,
        Environment::Local { .. } => Color::Yellow,
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!("Env: {}", state.environment),
            Style::default().fg(env_color),
        ),
        Span::raw("  "),
        Span::styled(
            uptime_string(state.start_time.elapsed().as_secs()),
            Style::default().fg(Color::LightGreen),
        ),
    ]));
    let refreshed = state
        .model
        .refreshed_at
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    lines.push(Line::from(Span::styled(
        format!(
            "Cycle {}  Refreshed: {}  Live/Fallback: {}/{}",
            state.model.cycle, refreshed, state.live_fetches, state.fallback_fetches
        ),
        Style::default().fg(Color::Gray),
    )));

    for view in &state.model.sources {
        lines.push(Line::from(""));
        let health = view.health();
        lines.push(Line::from(vec![
            Span::styled(
                format!("● {:<8} ", health.to_string().to_uppercase()),
                Style::default()
                    .fg(get_health_color(health))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                view.label.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));

        let Some(payload) = &view.payload else {
            lines.push(Line::from(Span::styled(
                "  Waiting for data",
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        };
        if let Some(period) = &payload.period {
            lines.push(Line::from(Span::styled(
                format!("  Period: {}", period),
                Style::default().fg(Color::Gray),
            )));
        }
        for (name, value) in &payload.metrics {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", name), Style::default().fg(Color::Gray)),
                Span::styled(
                    format_metric(name, *value),
                    Style::default().fg(Color::LightCyan),
                ),
            ]));
        }
    }

    let block = Block::default()
        .title("SOURCES")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
