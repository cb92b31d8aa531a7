mod cli_messages;
mod config;
mod consts;
mod display;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod network;
mod refresh;
mod report;
mod session;
mod sources;
mod ui;

use crate::config::{Config, get_config_path};
use crate::environment::Environment;
use crate::logging::init_logger;
use crate::refresh::RefreshOutcome;
use crate::report::ReportFormat;
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Live trade and economic statistics dashboard
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the dashboard and refresh it periodically
    Start {
        /// Print events to the console instead of drawing the dashboard
        #[arg(long, default_value_t = false)]
        headless: bool,

        /// Seconds between automatic refreshes (overrides the config file)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,

        /// Seconds a single source may take before its fallback is shown
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Disable the dashboard background color
        #[arg(long = "no-background", action = clap::ArgAction::SetTrue)]
        no_background: bool,
    },
    /// Run one refresh cycle and print what each source returned
    Refresh {
        /// Print the resulting display model as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run one refresh cycle and write a report
    Report {
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Write to this file instead of stdout
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a config file with default values
    Init,
    /// Print the effective configuration
    Show,
    /// Delete the config file
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let environment = Environment::from_env();
    let config_path = get_config_path()?;
    let args = Args::parse();

    match args.command {
        Command::Start {
            headless,
            interval,
            timeout,
            no_background,
        } => {
            let config = Config::load_or_default(&config_path)?.with_overrides(interval, timeout);
            start(config, environment, headless, !no_background).await
        }
        Command::Refresh { json } => {
            init_logger();
            let config = Config::load_or_default(&config_path)?;
            refresh_once(config, environment, json).await
        }
        Command::Report { format, output } => {
            init_logger();
            let config = Config::load_or_default(&config_path)?;
            write_report(config, environment, format, output).await
        }
        Command::Config { action } => handle_config(action, &config_path),
    }
}

/// Starts the coordinator in TUI or headless mode.
async fn start(
    config: Config,
    env: Environment,
    headless: bool,
    with_background: bool,
) -> Result<(), Box<dyn Error>> {
    let session = setup_session(&config, env, true)?;
    if headless {
        run_headless_mode(session).await
    } else {
        run_tui_mode(session, with_background).await
    }
}

async fn refresh_once(config: Config, env: Environment, json: bool) -> Result<(), Box<dyn Error>> {
    let session = setup_session(&config, env, false)?;
    let coordinator = session.coordinator;

    let RefreshOutcome::Completed(report) = coordinator.refresh_all_data().await else {
        print_cmd_error!("Refresh skipped", "another cycle was already running");
        return Err(Box::from("A refresh cycle was already running"));
    };

    let model = coordinator.display_model();
    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
        return Ok(());
    }

    for (name, outcome) in &report.outcomes {
        let title = match model.source(name) {
            Some(view) => format!("{} ({})", view.label, name),
            None => name.clone(),
        };
        cli_messages::print_source_outcome(&title, outcome);
    }
    print_cmd_info!("Status", "{}", model.headline());
    Ok(())
}

async fn write_report(
    config: Config,
    env: Environment,
    format: ReportFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let session = setup_session(&config, env, false)?;
    let coordinator = session.coordinator;
    coordinator.refresh_all_data().await;

    let contents = report::render(&coordinator.display_model(), format)?;
    match output {
        Some(path) => {
            report::write_to(&path, &contents)?;
            print_cmd_success!("Report written", "{} ({})", path.display(), format);
        }
        None => print!("{}", contents),
    }
    Ok(())
}

fn handle_config(action: ConfigAction, config_path: &std::path::Path) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigAction::Init => {
            if config_path.exists() {
                print_cmd_info!("Config already exists", "{}", config_path.display());
                return Ok(());
            }
            Config::default().save(config_path)?;
            print_cmd_success!("Config created", "{}", config_path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load_or_default(config_path)?;
            print_cmd_info!("Config file", "{}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Reset => {
            Config::clear(config_path)?;
            print_cmd_success!("Config reset", "removed {}", config_path.display());
            Ok(())
        }
    }
}
