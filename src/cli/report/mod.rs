pub mod text;
pub mod view;

use std::io::IsTerminal;

use crate::cli::OutputMode;
use crate::error::Result;
use crate::models::Selection;
use crate::session::Session;

/// Render one report for the session. Explicit year/month are resolved
/// through the offered periods; a missing part falls back to the default.
pub fn run(
    mut session: Session,
    year: Option<i32>,
    month: Option<String>,
    line_chart: bool,
    mode: Option<OutputMode>,
) -> Result<()> {
    if year.is_some() || month.is_some() {
        let current = session.selection();
        let year = year.unwrap_or(current.year);
        let month = month.unwrap_or_else(|| current.month.name().to_string());
        session.select(year, &month)?;
    }
    if line_chart {
        session.render_options.show_line_chart = true;
    }
    dispatch(session, mode)
}

pub fn dispatch(session: Session, mode: Option<OutputMode>) -> Result<()> {
    let text = match mode {
        Some(OutputMode::Text) => true,
        Some(OutputMode::View) => false,
        None => !std::io::stdout().is_terminal(),
    };
    if text {
        let s = dispatch_text(&session)?;
        println!("{s}");
        Ok(())
    } else {
        crate::cli::dashboard::run(session)
    }
}

pub(crate) fn dispatch_text(session: &Session) -> Result<String> {
    let artifacts = session.render()?;
    Ok(format!(
        "{}\n{}",
        header(&session.dataset().source, &artifacts.selection()),
        text::format_artifacts(&artifacts)
    ))
}

fn header(source: &str, selection: &Selection) -> String {
    format!("{source}: {selection}\n")
}
