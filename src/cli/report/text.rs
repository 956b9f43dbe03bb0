use colored::{Color as TermColor, Colorize};
use comfy_table::{Cell, Table};

use crate::fmt::{count, percent};
use crate::models::ReadStatus;
use crate::render::{
    no_data_notice, style_for, Artifacts, LineChart, PieChart, Report, StackedBarChart,
    StatusColor, YtdTable,
};

const BAR_WIDTH: usize = 40;
const SHARE_WIDTH: usize = 20;

fn term_color(status: ReadStatus) -> TermColor {
    match style_for(status).color {
        StatusColor::Green => TermColor::Green,
        StatusColor::Red => TermColor::Red,
    }
}

fn cells(value: u64, max: u64, width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    ((value as f64 / max as f64) * width as f64).round() as usize
}

// ---------------------------------------------------------------------------
// Pure formatting functions (artifacts → String)
// ---------------------------------------------------------------------------

pub fn format_artifacts(artifacts: &Artifacts) -> String {
    match artifacts {
        Artifacts::NoData(sel) => no_data_notice(sel).yellow().to_string(),
        Artifacts::Report(report) => format_report(report),
    }
}

pub fn format_report(report: &Report) -> String {
    let mut out = format_bar_chart(&report.bar);
    out.push_str("\n\n");
    out.push_str(&"\u{2500}".repeat(BAR_WIDTH + 20));
    out.push_str("\n\n");
    out.push_str(&format_ytd(&report.ytd));
    out.push_str("\n\n");
    out.push_str(&format_pie(&report.pie));
    if let Some(line) = report.visible_line_chart() {
        out.push_str("\n\n");
        out.push_str(&format_line(line));
    }
    out
}

/// Horizontal stacked bars, one per folder, with per-segment counts.
pub fn format_bar_chart(chart: &StackedBarChart) -> String {
    let mut out = format!("{}\n", chart.title.bold());

    let legend: Vec<String> = chart
        .legend
        .iter()
        .map(|s| format!("{} {}", "\u{25a0}".color(term_color(*s)), s.label()))
        .collect();
    out.push_str(&format!("Read Status: {}\n\n", legend.join("  ")));

    let name_width = chart
        .bars
        .iter()
        .map(|b| b.folder.chars().count())
        .max()
        .unwrap_or(6);
    let max = chart.max_total();

    for bar in &chart.bars {
        let mut drawn = 0usize;
        let mut blocks = String::new();
        let mut labels = Vec::new();
        for seg in &bar.segments {
            let upto = cells(seg.top, max, BAR_WIDTH);
            let width = upto.saturating_sub(drawn);
            blocks.push_str(
                &"\u{2588}"
                    .repeat(width)
                    .color(term_color(seg.status))
                    .to_string(),
            );
            drawn = drawn.max(upto);
            labels.push(format!(
                "{} {}",
                seg.status.label().color(term_color(seg.status)),
                count(seg.count)
            ));
        }
        let pad = " ".repeat(BAR_WIDTH.saturating_sub(drawn));
        out.push_str(&format!(
            "{:<name_width$}  {blocks}{pad}  {}  ({})\n",
            bar.folder,
            count(bar.total).bold(),
            labels.join(", "),
        ));
    }
    out.trim_end().to_string()
}

pub fn format_ytd(data: &YtdTable) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Folder", "Read Status", "Email Count"]);
    let mut previous: Option<&str> = None;
    for r in &data.rows {
        let folder = if previous == Some(r.folder.as_str()) {
            ""
        } else {
            r.folder.as_str()
        };
        previous = Some(r.folder.as_str());
        table.add_row(vec![
            Cell::new(folder),
            Cell::new(r.status.label().color(term_color(r.status))),
            Cell::new(count(r.count)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(count(data.total).bold()),
    ]);
    format!("{}\n{table}", data.title.bold())
}

pub fn format_pie(data: &PieChart) -> String {
    if data.total == 0 {
        return format!("{}\nNo emails recorded this year.", data.title.bold());
    }
    let max = data.slices.iter().map(|s| s.count).max().unwrap_or(0);
    let mut table = Table::new();
    table.set_header(vec!["Folder", "Emails", "Share", ""]);
    for s in &data.slices {
        table.add_row(vec![
            Cell::new(&s.folder),
            Cell::new(count(s.count)),
            Cell::new(percent(s.percent)),
            Cell::new("\u{2588}".repeat(cells(s.count, max, SHARE_WIDTH))),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(count(data.total)),
        Cell::new(percent(100.0)),
        Cell::new(""),
    ]);
    format!("{}\n{table}", data.title.bold())
}

pub fn format_line(data: &LineChart) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Month", "Emails", "Cumulative"]);
    for p in &data.points {
        table.add_row(vec![
            Cell::new(p.month.name()),
            Cell::new(count(p.total)),
            Cell::new(count(p.cumulative)),
        ]);
    }
    format!("{}\n{table}", data.title.bold())
}
