mod cli;
mod error;
mod fmt;
mod loader;
mod models;
mod render;
mod reports;
mod selector;
mod session;
mod settings;
mod tui;

use anyhow::Context;
use chrono::Local;
use clap::Parser;

use cli::{Cli, Commands};
use session::Session;
use settings::{default_data_file, load_settings, shellexpand_path};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings();
    let today = Local::now().date_naive();
    let path = cli
        .file
        .as_deref()
        .map(shellexpand_path)
        .unwrap_or_else(|| default_data_file(&settings));
    let open = || {
        Session::open(&path, today)
            .with_context(|| format!("could not load {}", path.display()))
    };

    match cli.command {
        None => {
            let mut session = open()?;
            session.render_options.show_line_chart = settings.show_line_chart;
            cli::report::dispatch(session, None)?;
        }
        Some(Commands::Report {
            year,
            month,
            line_chart,
            mode,
        }) => {
            let session = open()?;
            let line_chart = line_chart || settings.show_line_chart;
            cli::report::run(session, year, month, line_chart, mode)?;
        }
        Some(Commands::Periods) => cli::periods::run(&open()?),
        Some(Commands::Demo { line_chart, mode }) => {
            cli::demo::run(today, line_chart || settings.show_line_chart, mode)?;
        }
    }
    Ok(())
}
