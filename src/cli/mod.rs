pub mod dashboard;
pub mod demo;
pub mod periods;
pub mod report;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "email-status",
    version,
    about = "Email read/unread status by folder, month and year."
)]
pub struct Cli {
    /// CSV with Date, Folder, Read Status and Email Count columns
    /// (default: email_status.csv, or `default_file` in settings)
    #[arg(long, global = true)]
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the charts for one month (dashboard on a terminal, text otherwise).
    Report {
        /// Year, e.g. 2024 (default: this year if present, else the latest)
        #[arg(long)]
        year: Option<i32>,
        /// Month name, e.g. March or Mar (default: this month if present)
        #[arg(long)]
        month: Option<String>,
        /// Include the cumulative monthly line chart
        #[arg(long = "line-chart")]
        line_chart: bool,
        #[arg(long, value_enum)]
        mode: Option<OutputMode>,
    },
    /// List the years and months available in the file.
    Periods,
    /// Explore the dashboard on generated sample data.
    Demo {
        /// Include the cumulative monthly line chart
        #[arg(long = "line-chart")]
        line_chart: bool,
        #[arg(long, value_enum)]
        mode: Option<OutputMode>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Interactive full-screen dashboard
    View,
    /// Plain text to stdout
    Text,
}
