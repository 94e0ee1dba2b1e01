#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the crime report.
//!
//! Renders the geographic heatmap, the monthly trend chart and the
//! day/night rate chart from an incident export and a sunrise/sunset
//! table. Run without a subcommand to pick the output from a menu.
//!
//! Uses `indicatif-log-bridge` (via [`crime_report_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the load progress bar never fight for the terminal.

mod report;
mod summary;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crime_report_config::ReportConfig;
use dialoguer::Select;

use crate::report::Action;

#[derive(Parser)]
#[command(name = "crime_report", about = "Crime incident report figures")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TOML file layered over the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Incident CSV export
    #[arg(long, global = true)]
    incidents: Option<PathBuf>,

    /// Whitespace-delimited sunrise/sunset table
    #[arg(long, global = true)]
    sun_table: Option<PathBuf>,

    /// Directory the figures are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Also write every aggregate to `summary.json`
    #[arg(long, global = true)]
    export_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render all three figures and print the summary
    All,
    /// Figure 1: geographic density heatmap
    Heatmap,
    /// Figure 2: monthly average crimes per day with trend line
    Trend,
    /// Figure 3: day and night crimes per hour by month
    Daylight,
    /// Print the monthly tables without rendering figures
    Summary,
}

impl From<Commands> for Action {
    fn from(command: Commands) -> Self {
        match command {
            Commands::All => Self::All,
            Commands::Heatmap => Self::Heatmap,
            Commands::Trend => Self::Trend,
            Commands::Daylight => Self::DayNight,
            Commands::Summary => Self::Summary,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_report_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::defaults()?,
    };
    if let Some(path) = cli.incidents {
        config.incidents_path = path;
    }
    if let Some(path) = cli.sun_table {
        config.sun_table_path = path;
    }
    if let Some(path) = cli.output_dir {
        config.output_dir = path;
    }

    let action = match cli.command {
        Some(command) => Action::from(command),
        None => select_action(&config)?,
    };

    report::run(action, &config, cli.export_json, &multi)
}

/// Interactive fallback when no subcommand is given.
fn select_action(config: &ReportConfig) -> Result<Action, Box<dyn std::error::Error>> {
    println!("{} {} Crime Report", config.year, config.city);
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to produce?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(Action::ALL[idx])
}
