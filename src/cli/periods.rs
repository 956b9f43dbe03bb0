use colored::Colorize;

use crate::selector::TimeOptions;
use crate::session::Session;

pub fn run(session: &Session) {
    println!("{}", format_periods(&session.dataset().source, session.time_options()));
}

/// Offered years and months, newest first, with the defaults marked `*`.
pub fn format_periods(source: &str, options: &TimeOptions) -> String {
    let mark = |selected: bool| if selected { "*" } else { " " };
    let mut out = format!("{}\n\n{}\n", source.bold(), "Years".bold());
    for (i, year) in options.years.iter().enumerate() {
        out.push_str(&format!(" {} {year}\n", mark(i == options.default_year_index)));
    }
    out.push_str(&format!("\n{}\n", "Months".bold()));
    for (i, month) in options.months.iter().enumerate() {
        out.push_str(&format!(
            " {} {}\n",
            mark(i == options.default_month_index),
            month.name()
        ));
    }
    out.trim_end().to_string()
}
