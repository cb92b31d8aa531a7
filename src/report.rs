//! Printable reports of the display model

use crate::display::{DisplayModel, SourceView};
use crate::refresh::SourceHealth;
use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

pub fn render(model: &DisplayModel, format: ReportFormat) -> io::Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(model)),
        ReportFormat::Json => serde_json::to_string_pretty(model)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
    }
}

fn local_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| {
        t.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    })
    .unwrap_or_else(|| "never".to_string())
}

fn badge(health: SourceHealth) -> &'static str {
    match health {
        SourceHealth::Online => "LIVE",
        SourceHealth::Offline => "FALLBACK",
        SourceHealth::Pending => "PENDING",
    }
}

/// Formats a metric the way a reader expects: separators for large values,
/// two decimals for percentages and small values.
pub fn format_metric(name: &str, value: f64) -> String {
    if name.ends_with("_pct") {
        return format!("{:+.2}%", value);
    }
    if value.abs() >= 1_000_000_000.0 {
        return format!("{:.2}B", value / 1_000_000_000.0);
    }
    if value.abs() >= 1_000_000.0 {
        return format!("{:.2}M", value / 1_000_000.0);
    }
    if value.fract() == 0.0 && value.abs() < 1_000_000.0 {
        return group_thousands(value as i64);
    }
    format!("{:.2}", value)
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

fn write_source(out: &mut String, view: &SourceView) {
    let _ = writeln!(out, "[{}] {} ({})", badge(view.health()), view.label, view.name());
    match &view.payload {
        Some(payload) => {
            let _ = writeln!(
                out,
                "  Period:       {}",
                payload.period.as_deref().unwrap_or("n/a")
            );
            for (name, value) in &payload.metrics {
                let _ = writeln!(out, "  {:<36} {}", name, format_metric(name, *value));
            }
        }
        None => {
            let _ = writeln!(out, "  No data yet");
        }
    }
    let _ = writeln!(out, "  Updated:      {}", local_time(view.status.updated_at));
    let _ = writeln!(out, "  Last live:    {}", local_time(view.status.last_live_at));
    if let Some(error) = &view.status.last_error {
        let _ = writeln!(out, "  Last error:   {}", error);
    }
}

pub fn render_text(model: &DisplayModel) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "TRADE PULSE REPORT");
    let _ = writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Refreshed: {}", local_time(model.refreshed_at));
    let _ = writeln!(out, "{}", rule);

    for view in &model.sources {
        let _ = writeln!(out);
        write_source(&mut out, view);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Status: {}", model.headline());
    let _ = writeln!(out, "{}", rule);
    out
}

/// Writes `contents` to `path`, creating parent directories as needed.
pub fn write_to(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)
}
