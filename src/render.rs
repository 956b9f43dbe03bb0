//! The report pipeline: dataset + selection in, chart/table artifacts out.
//!
//! Everything here is pure so the dashboard can re-run it after each
//! keypress and the text presenter can share it.

use chrono::Month;

use crate::error::{ReportError, Result};
use crate::models::{month_from_number, Dataset, ReadStatus, Selection};
use crate::reports::{self, FolderStatusAggregate};

// ---------------------------------------------------------------------------
// Status styling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Green,
    Red,
}

#[derive(Debug, Clone, Copy)]
pub struct StatusStyle {
    pub status: ReadStatus,
    pub color: StatusColor,
    /// Lower values sit at the bottom of a stacked bar.
    pub stack_order: u8,
}

pub const STATUS_STYLES: &[StatusStyle] = &[
    StatusStyle {
        status: ReadStatus::Read,
        color: StatusColor::Green,
        stack_order: 0,
    },
    StatusStyle {
        status: ReadStatus::Unread,
        color: StatusColor::Red,
        stack_order: 1,
    },
];

pub fn style_for(status: ReadStatus) -> StatusStyle {
    STATUS_STYLES
        .iter()
        .copied()
        .find(|s| s.status == status)
        .unwrap_or(StatusStyle {
            status,
            color: StatusColor::Red,
            stack_order: u8::MAX,
        })
}

/// Statuses in stacking order.
fn stacked_statuses() -> Vec<ReadStatus> {
    let mut styles = STATUS_STYLES.to_vec();
    styles.sort_by_key(|s| s.stack_order);
    styles.into_iter().map(|s| s.status).collect()
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub show_line_chart: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artifacts {
    /// Nothing recorded for the selected month; no chart is drawn.
    NoData(Selection),
    Report(Box<Report>),
}

impl Artifacts {
    pub fn selection(&self) -> Selection {
        match self {
            Self::NoData(sel) => *sel,
            Self::Report(r) => r.selection,
        }
    }
}

pub fn no_data_notice(selection: &Selection) -> String {
    format!("No data for {selection}.")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub selection: Selection,
    pub bar: StackedBarChart,
    pub ytd: YtdTable,
    pub pie: PieChart,
    pub line: LineChart,
    pub show_line_chart: bool,
}

impl Report {
    /// The line chart is always computed but only shown on request.
    pub fn visible_line_chart(&self) -> Option<&LineChart> {
        self.show_line_chart.then_some(&self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarSegment {
    pub status: ReadStatus,
    pub count: u64,
    /// Stack height at the top of this segment.
    pub top: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderBar {
    pub folder: String,
    pub segments: Vec<BarSegment>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackedBarChart {
    pub title: String,
    pub bars: Vec<FolderBar>,
    /// Each status drawn in the chart, once, in stack order.
    pub legend: Vec<ReadStatus>,
}

impl StackedBarChart {
    pub fn max_total(&self) -> u64 {
        self.bars.iter().map(|b| b.total).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtdRow {
    pub folder: String,
    pub status: ReadStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtdTable {
    pub title: String,
    pub rows: Vec<YtdRow>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub folder: String,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePoint {
    pub month: Month,
    pub total: u64,
    pub cumulative: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChart {
    pub title: String,
    pub points: Vec<LinePoint>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn build_bar_chart(selection: &Selection, agg: &FolderStatusAggregate) -> StackedBarChart {
    let order = stacked_statuses();
    let mut bars: Vec<FolderBar> = Vec::new();
    let mut legend: Vec<ReadStatus> = Vec::new();

    // BTreeMap keys arrive grouped by folder; statuses are re-ordered below.
    for (folder, _) in agg.keys() {
        if bars.last().map(|b| &b.folder) == Some(folder) {
            continue;
        }
        let mut segments = Vec::new();
        let mut height = 0u64;
        for status in &order {
            if let Some(&count) = agg.get(&(folder.clone(), *status)) {
                height += count;
                segments.push(BarSegment {
                    status: *status,
                    count,
                    top: height,
                });
            }
        }
        bars.push(FolderBar {
            folder: folder.clone(),
            segments,
            total: height,
        });
    }

    for status in &order {
        let present = bars
            .iter()
            .any(|b| b.segments.iter().any(|s| s.status == *status));
        if present {
            legend.push(*status);
        }
    }

    StackedBarChart {
        title: format!("Email Status by Folder for {selection}"),
        bars,
        legend,
    }
}

fn build_ytd_table(year: i32, agg: &FolderStatusAggregate) -> YtdTable {
    let mut rows: Vec<YtdRow> = agg
        .iter()
        .map(|((folder, status), count)| YtdRow {
            folder: folder.clone(),
            status: *status,
            count: *count,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.folder
            .cmp(&b.folder)
            .then(style_for(a.status).stack_order.cmp(&style_for(b.status).stack_order))
    });
    let total = rows.iter().map(|r| r.count).sum();
    YtdTable {
        title: format!("Year-to-Date Totals for {year}"),
        rows,
        total,
    }
}

fn build_pie_chart(dataset: &Dataset, year: i32) -> PieChart {
    let totals = reports::ytd_folder_totals(dataset, year);
    let total: u64 = totals.values().sum();
    let slices = totals
        .into_iter()
        .map(|(folder, count)| PieSlice {
            folder,
            count,
            percent: if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    PieChart {
        title: format!("Year-to-Date Percent Folder Distribution for {year}"),
        slices,
        total,
    }
}

fn build_line_chart(dataset: &Dataset, year: i32) -> LineChart {
    let points = reports::monthly_totals(dataset, year)
        .into_iter()
        .filter_map(|m| {
            Some(LinePoint {
                month: month_from_number(m.month)?,
                total: m.total,
                cumulative: m.cumulative,
            })
        })
        .collect();
    LineChart {
        title: format!("Cumulative Monthly Email Totals for {year}"),
        points,
    }
}

/// Run the whole report for one selection.
pub fn render(dataset: &Dataset, selection: Selection, options: RenderOptions) -> Result<Artifacts> {
    let monthly = match reports::monthly_folder_status(dataset, selection.year, selection.month) {
        Ok(agg) => agg,
        Err(ReportError::EmptySelection { .. }) => return Ok(Artifacts::NoData(selection)),
        Err(e) => return Err(e),
    };
    let ytd = reports::ytd_folder_status(dataset, selection.year);

    Ok(Artifacts::Report(Box::new(Report {
        selection,
        bar: build_bar_chart(&selection, &monthly),
        ytd: build_ytd_table(selection.year, &ytd),
        pie: build_pie_chart(dataset, selection.year),
        line: build_line_chart(dataset, selection.year),
        show_line_chart: options.show_line_chart,
    })))
}
