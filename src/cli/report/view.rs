use std::f64::consts::{FRAC_PI_2, TAU};

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Axis, Block, Borders, Cell, Chart, Dataset as Series, GraphType, Paragraph, Row, Table,
        Widget,
    },
};

use crate::fmt::{count, percent, short_month};
use crate::models::ReadStatus;
use crate::render::{LineChart, PieChart, Report, StackedBarChart, YtdTable};
use crate::tui::{status_color, wrap_text, NOTICE_STYLE, TITLE_STYLE};

const HEADER_ROW_STYLE: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::BOLD);

const SLICE_COLORS: &[Color] = &[
    Color::Blue,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::LightGreen,
    Color::LightRed,
    Color::LightBlue,
    Color::Gray,
];

fn titled(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(TITLE_STYLE)
        .borders(Borders::NONE)
}

pub fn legend_line(statuses: &[ReadStatus]) -> Line<'static> {
    let mut spans = vec![Span::styled("Read Status: ", Style::new().fg(Color::DarkGray))];
    for status in statuses {
        spans.push(Span::styled("\u{25a0} ", Style::new().fg(status_color(*status))));
        spans.push(Span::raw(format!("{}  ", status.label())));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Stacked bar chart
// ---------------------------------------------------------------------------

pub struct StackedBars<'a> {
    chart: &'a StackedBarChart,
}

impl<'a> StackedBars<'a> {
    pub fn new(chart: &'a StackedBarChart) -> Self {
        Self { chart }
    }
}

fn scale(value: u64, max: u64, rows: u16) -> u16 {
    let rows_f = (value as f64 / max.max(1) as f64) * rows as f64;
    (rows_f.round() as u16).min(rows)
}

impl Widget for StackedBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chart = self.chart;
        let [title_area, legend_area, plot_area, label_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Paragraph::new(Span::styled(chart.title.clone(), TITLE_STYLE)).render(title_area, buf);
        Paragraph::new(legend_line(&chart.legend)).render(legend_area, buf);

        if chart.bars.is_empty() || plot_area.height < 2 || plot_area.width < 2 {
            return;
        }

        let n = chart.bars.len() as u16;
        let gap = 2u16;
        let bar_width = (plot_area.width.saturating_sub(gap * n) / n).clamp(1, 12);
        let max = chart.max_total();
        // Top row is kept free for the bar total.
        let bar_rows = plot_area.height - 1;
        let bottom = plot_area.bottom() - 1;

        for (i, bar) in chart.bars.iter().enumerate() {
            let x = plot_area.x + 1 + i as u16 * (bar_width + gap);
            if x + bar_width > plot_area.right() {
                break;
            }

            let mut drawn = 0u16;
            for seg in &bar.segments {
                let top_rows = scale(seg.top, max, bar_rows);
                let color = status_color(seg.status);
                for row in drawn..top_rows {
                    buf.set_string(
                        x,
                        bottom - row,
                        "\u{2588}".repeat(bar_width as usize),
                        Style::new().fg(color),
                    );
                }
                let label = count(seg.count);
                if top_rows > drawn && label.len() as u16 <= bar_width {
                    let lx = x + (bar_width - label.len() as u16) / 2;
                    buf.set_string(
                        lx,
                        bottom - (top_rows - 1),
                        &label,
                        Style::new().fg(Color::Black).bg(color),
                    );
                }
                drawn = drawn.max(top_rows);
            }

            let total = count(bar.total);
            let tx = x + bar_width.saturating_sub(total.len() as u16) / 2;
            buf.set_stringn(
                tx,
                bottom - drawn,
                &total,
                (bar_width + gap - 1) as usize,
                TITLE_STYLE,
            );
            buf.set_stringn(
                x,
                label_area.y,
                &bar.folder,
                (bar_width + gap - 1) as usize,
                Style::default(),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Year-to-date table
// ---------------------------------------------------------------------------

pub fn ytd_table(data: &YtdTable) -> Table<'_> {
    let widths = [
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Length(12),
    ];
    let header = Row::new(["Folder", "Read Status", "Email Count"])
        .style(HEADER_ROW_STYLE)
        .bottom_margin(1);

    let mut rows = Vec::new();
    let mut previous: Option<&str> = None;
    for r in &data.rows {
        // Folder shown once per group, like a two-level index.
        let folder = if previous == Some(r.folder.as_str()) {
            String::new()
        } else {
            r.folder.clone()
        };
        previous = Some(r.folder.as_str());
        rows.push(Row::new([
            Cell::from(folder),
            Cell::from(Span::styled(
                r.status.label(),
                Style::new().fg(status_color(r.status)),
            )),
            Cell::from(count(r.count)),
        ]));
    }
    rows.push(Row::new([
        Cell::from(Span::styled("Total", TITLE_STYLE)),
        Cell::from(""),
        Cell::from(Span::styled(count(data.total), TITLE_STYLE)),
    ]));

    Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(titled(&data.title))
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

pub struct PieView<'a> {
    pie: &'a PieChart,
}

impl<'a> PieView<'a> {
    pub fn new(pie: &'a PieChart) -> Self {
        Self { pie }
    }
}

struct SliceShape {
    points: Vec<(f64, f64)>,
    color: Color,
    label_at: (f64, f64),
    label: String,
}

fn slice_color(i: usize) -> Color {
    SLICE_COLORS[i % SLICE_COLORS.len()]
}

/// Slices start at twelve o'clock and run counter-clockwise.
fn slice_shapes(pie: &PieChart) -> Vec<SliceShape> {
    let mut start = FRAC_PI_2;
    let mut shapes = Vec::new();
    for (i, slice) in pie.slices.iter().enumerate() {
        let sweep = TAU * slice.percent / 100.0;
        let arc_steps = ((sweep * 60.0).ceil() as usize).max(2);
        let mut points = Vec::with_capacity(arc_steps * 25);
        for r_step in 1..=24 {
            let r = r_step as f64 / 24.0;
            for a_step in 0..=arc_steps {
                let theta = start + sweep * a_step as f64 / arc_steps as f64;
                points.push((r * theta.cos(), r * theta.sin()));
            }
        }
        let mid = start + sweep / 2.0;
        shapes.push(SliceShape {
            points,
            color: slice_color(i),
            label_at: (0.6 * mid.cos(), 0.6 * mid.sin()),
            label: if slice.percent >= 5.0 {
                percent(slice.percent)
            } else {
                String::new()
            },
        });
        start += sweep;
    }
    shapes
}

impl Widget for PieView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let pie = self.pie;
        let block = titled(&pie.title);
        let inner = block.inner(area);
        block.render(area, buf);

        if pie.total == 0 {
            Paragraph::new("No emails recorded this year.")
                .style(NOTICE_STYLE)
                .render(inner, buf);
            return;
        }

        let legend_width = pie
            .slices
            .iter()
            .map(|s| s.folder.chars().count() + 12)
            .max()
            .unwrap_or(12)
            .min(inner.width as usize / 2) as u16;
        let [canvas_area, legend_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(legend_width)])
                .areas(inner);

        // Braille dots are roughly square, so widen x by the cell aspect.
        let half_y = 1.1;
        let half_x = half_y * canvas_area.width as f64 / (2.0 * canvas_area.height.max(1) as f64);
        let shapes = slice_shapes(pie);
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-half_x, half_x])
            .y_bounds([-half_y, half_y])
            .paint(|ctx| {
                for shape in &shapes {
                    ctx.draw(&Points {
                        coords: &shape.points,
                        color: shape.color,
                    });
                }
                ctx.layer();
                for shape in &shapes {
                    if !shape.label.is_empty() {
                        ctx.print(
                            shape.label_at.0,
                            shape.label_at.1,
                            Span::styled(shape.label.clone(), TITLE_STYLE),
                        );
                    }
                }
            })
            .render(canvas_area, buf);

        let lines: Vec<Line> = pie
            .slices
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Line::from(vec![
                    Span::styled("\u{25a0} ", Style::new().fg(slice_color(i))),
                    Span::raw(format!("{} {}", s.folder, percent(s.percent))),
                ])
            })
            .collect();
        Paragraph::new(lines).render(legend_area, buf);
    }
}

// ---------------------------------------------------------------------------
// Cumulative line chart
// ---------------------------------------------------------------------------

pub struct LineView<'a> {
    line: &'a LineChart,
}

impl<'a> LineView<'a> {
    pub fn new(line: &'a LineChart) -> Self {
        Self { line }
    }
}

impl Widget for LineView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let points = &self.line.points;
        let monthly: Vec<(f64, f64)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.total as f64))
            .collect();
        let cumulative: Vec<(f64, f64)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.cumulative as f64))
            .collect();

        let mut x_labels: Vec<String> = points
            .iter()
            .map(|p| short_month(p.month).to_string())
            .collect();
        if x_labels.len() == 1 {
            x_labels.push(String::new());
        }
        let x_max = (points.len().max(2) - 1) as f64;
        let y_max = points
            .iter()
            .map(|p| p.cumulative)
            .max()
            .unwrap_or(0)
            .max(1);

        let series = vec![
            Series::default()
                .name("Monthly")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::new().fg(Color::Cyan))
                .data(&monthly),
            Series::default()
                .name("Cumulative")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::new().fg(Color::Yellow))
                .data(&cumulative),
        ];

        Chart::new(series)
            .block(titled(&self.line.title))
            .x_axis(
                Axis::default()
                    .style(Style::new().fg(Color::DarkGray))
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(Style::new().fg(Color::DarkGray))
                    .bounds([0.0, y_max as f64])
                    .labels(vec!["0".to_string(), count(y_max / 2), count(y_max)]),
            )
            .render(area, buf);
    }
}

// ---------------------------------------------------------------------------
// Whole report
// ---------------------------------------------------------------------------

pub struct ReportBody<'a> {
    report: &'a Report,
}

impl<'a> ReportBody<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }
}

impl Widget for ReportBody<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let report = self.report;
        let [bar_area, lower] =
            Layout::vertical([Constraint::Percentage(55), Constraint::Fill(1)]).areas(area);

        StackedBars::new(&report.bar).render(bar_area, buf);

        match report.visible_line_chart() {
            Some(line) => {
                let [ytd_area, pie_area, line_area] = Layout::horizontal([
                    Constraint::Percentage(34),
                    Constraint::Percentage(33),
                    Constraint::Percentage(33),
                ])
                .areas(lower);
                Widget::render(ytd_table(&report.ytd), ytd_area, buf);
                PieView::new(&report.pie).render(pie_area, buf);
                LineView::new(line).render(line_area, buf);
            }
            None => {
                let [ytd_area, pie_area] = Layout::horizontal([
                    Constraint::Percentage(50),
                    Constraint::Percentage(50),
                ])
                .areas(lower);
                Widget::render(ytd_table(&report.ytd), ytd_area, buf);
                PieView::new(&report.pie).render(pie_area, buf);
            }
        }
    }
}

/// Shown in place of every chart when the period has no rows.
pub struct NoticeView<'a> {
    message: &'a str,
}

impl<'a> NoticeView<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Widget for NoticeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (wrapped, lines) = wrap_text(self.message, area.width.saturating_sub(4) as usize);
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(lines),
            Constraint::Fill(1),
        ])
        .areas(area);
        Paragraph::new(wrapped)
            .style(NOTICE_STYLE)
            .alignment(Alignment::Center)
            .render(middle, buf);
    }
}
