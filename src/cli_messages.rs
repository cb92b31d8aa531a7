//! One-line console messages for the one-shot commands (`refresh`, `report`,
//! `config`).

use crate::refresh::SourceOutcome;

const RESET: &str = "\x1b[0m";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tag {
    Info,
    Warn,
    Error,
    Success,
}

impl Tag {
    fn color(self) -> &'static str {
        match self {
            Tag::Info => "\x1b[1;33m",
            Tag::Warn => "\x1b[1;91m",
            Tag::Error => "\x1b[1;31m",
            Tag::Success => "\x1b[1;32m",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Tag::Info => "INFO",
            Tag::Warn => "WARN",
            Tag::Error => "ERROR",
            Tag::Success => "SUCCESS",
        }
    }
}

/// Formats `[TAG] title<TAB> details`; empty details drop the tab.
pub fn format_line(tag: Tag, title: &str, details: &str) -> String {
    let mut line = format!("{}[{}]{} {}", tag.color(), tag.label(), RESET, title);
    if !details.is_empty() {
        line.push_str("\t ");
        line.push_str(details);
    }
    line
}

pub fn print_line(tag: Tag, title: &str, details: &str) {
    println!("{}", format_line(tag, title, details));
}

/// One line per source after a `refresh`: green when live, red when on fallback.
pub fn print_source_outcome(title: &str, outcome: &SourceOutcome) {
    let period = outcome.payload().period.as_deref().unwrap_or("latest period");
    match outcome {
        SourceOutcome::Live(_) => {
            print_line(Tag::Success, title, &format!("live data for {}", period));
        }
        SourceOutcome::Fallback { reason, .. } => print_line(
            Tag::Warn,
            title,
            &format!("fallback data for {} ({})", period, reason),
        ),
    }
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_line(
            $crate::cli_messages::Tag::Info,
            $title,
            &format!($($details)*),
        )
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_line($crate::cli_messages::Tag::Error, $title, "")
    };
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_line(
            $crate::cli_messages::Tag::Error,
            $title,
            &format!($($details)*),
        )
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_line(
            $crate::cli_messages::Tag::Success,
            $title,
            &format!($($details)*),
        )
    };
}
