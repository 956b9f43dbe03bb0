use std::path::Path;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use crate::error::Result;
use crate::models::ReadStatus;
use crate::render::{no_data_notice, Artifacts, Report};
use crate::session::Session;
use crate::settings::shellexpand_path;
use crate::tui::{
    count_span, run_report_view, ReportView, ReportViewAction, ERROR_STYLE, FOOTER_STYLE,
    HEADER_STYLE, NOTICE_STYLE, SELECTED_STYLE,
};

use super::report::view::{NoticeView, ReportBody};

enum StatusMessage {
    Info(String),
    Error(String),
}

/// Full-screen dashboard: year and month selectors over the charts for the
/// current selection. Every key that changes state re-renders the artifacts.
pub struct Dashboard {
    session: Session,
    artifacts: Option<Artifacts>,
    status: Option<StatusMessage>,
    /// Path being typed at the open prompt.
    input: Option<String>,
}

impl Dashboard {
    pub fn new(session: Session) -> Self {
        let mut dashboard = Self {
            session,
            artifacts: None,
            status: None,
            input: None,
        };
        dashboard.refresh();
        dashboard
    }

    fn refresh(&mut self) {
        match self.session.render() {
            Ok(artifacts) => self.artifacts = Some(artifacts),
            Err(e) => {
                self.artifacts = None;
                self.status = Some(StatusMessage::Error(e.to_string()));
            }
        }
    }

    fn open(&mut self, raw: &str) {
        let raw = raw.trim();
        if raw.is_empty() {
            return;
        }
        let path = shellexpand_path(raw);
        if !has_csv_extension(&path) {
            self.status = Some(StatusMessage::Error(format!(
                "{} is not a CSV file (expected a .csv extension)",
                path.display()
            )));
            return;
        }
        self.status = Some(match self.session.load_file(&path) {
            Ok(()) => StatusMessage::Info(format!(
                "Data successfully loaded from {}",
                self.session.dataset().source
            )),
            Err(e) => StatusMessage::Error(e.to_string()),
        });
    }

    fn handle_prompt_key(&mut self, code: KeyCode) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                if let Some(raw) = self.input.take() {
                    self.open(&raw);
                }
            }
            KeyCode::Esc => self.input = None,
            _ => {}
        }
    }

    fn draw_selectors(&self) -> Line<'static> {
        let sel = self.session.selection();
        let options = self.session.time_options();
        let arrow = |on: bool, s: &'static str| {
            if on {
                Span::raw(s)
            } else {
                Span::styled(s, FOOTER_STYLE)
            }
        };
        // Lists run newest first: Up and Right move toward the front.
        let years = &options.years;
        let year_pos = years.iter().position(|&y| y == sel.year).unwrap_or(0);
        let months = &options.months;
        let month_pos = months.iter().position(|&m| m == sel.month).unwrap_or(0);

        Line::from(vec![
            Span::raw(" Year "),
            arrow(year_pos > 0, "\u{25b2}"),
            Span::styled(format!(" {} ", sel.year), SELECTED_STYLE),
            arrow(year_pos + 1 < years.len(), "\u{25bc}"),
            Span::raw("    Month "),
            arrow(month_pos + 1 < months.len(), "\u{25c0}"),
            Span::styled(format!(" {} ", sel.month.name()), SELECTED_STYLE),
            arrow(month_pos > 0, "\u{25b6}"),
        ])
    }

    fn draw_header(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" Email Status \u{2500} {}", self.session.dataset().source),
            HEADER_STYLE,
        )];
        if let Some(Artifacts::Report(report)) = &self.artifacts {
            for &status in &report.bar.legend {
                spans.push(Span::raw(format!("   {} ", status.label())));
                spans.push(count_span(status, status_total(report, status)));
            }
        }
        Line::from(spans)
    }

    fn draw_status(&self) -> Line<'static> {
        if let Some(input) = &self.input {
            return Line::from(vec![
                Span::styled(" Open CSV: ", HEADER_STYLE),
                Span::raw(format!("{input}_")),
            ]);
        }
        match &self.status {
            Some(StatusMessage::Info(m)) => Line::styled(format!(" {m}"), NOTICE_STYLE),
            Some(StatusMessage::Error(m)) => Line::styled(format!(" {m}"), ERROR_STYLE),
            None => Line::default(),
        }
    }

    fn footer(&self) -> &'static str {
        if self.input.is_some() {
            " Enter load  Esc cancel"
        } else if self.session.render_options.show_line_chart {
            " \u{2191}\u{2193} year  \u{2190}\u{2192} month  o open  l hide line chart  q quit"
        } else {
            " \u{2191}\u{2193} year  \u{2190}\u{2192} month  o open  l show line chart  q quit"
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn status_total(report: &Report, status: ReadStatus) -> u64 {
    report
        .bar
        .bars
        .iter()
        .flat_map(|b| b.segments.iter())
        .filter(|s| s.status == status)
        .map(|s| s.count)
        .sum()
}

impl ReportView for Dashboard {
    fn draw(&mut self, frame: &mut Frame) {
        let [header, selectors, _, body, status, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(Paragraph::new(self.draw_header()), header);
        frame.render_widget(Paragraph::new(self.draw_selectors()), selectors);

        let body_area = body.inner(ratatui::layout::Margin::new(1, 0));
        match &self.artifacts {
            Some(Artifacts::Report(report)) => {
                ReportBody::new(report).render(body_area, frame.buffer_mut());
            }
            Some(Artifacts::NoData(sel)) => {
                let notice = no_data_notice(sel);
                NoticeView::new(&notice).render(body_area, frame.buffer_mut());
            }
            None => {}
        }

        frame.render_widget(Paragraph::new(self.draw_status()), status);
        frame.render_widget(
            Paragraph::new(self.footer()).style(FOOTER_STYLE),
            footer,
        );
    }

    fn handle_key(&mut self, code: KeyCode) -> ReportViewAction {
        if self.input.is_some() {
            self.handle_prompt_key(code);
            self.refresh();
            return ReportViewAction::Continue;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ReportViewAction::Close,
            KeyCode::Up => self.session.step_year(-1),
            KeyCode::Down => self.session.step_year(1),
            KeyCode::Left => self.session.step_month(1),
            KeyCode::Right => self.session.step_month(-1),
            KeyCode::Char('l') => {
                let opts = &mut self.session.render_options;
                opts.show_line_chart = !opts.show_line_chart;
            }
            KeyCode::Char('o') => {
                self.input = Some(String::new());
                return ReportViewAction::Continue;
            }
            _ => return ReportViewAction::Continue,
        }
        self.refresh();
        ReportViewAction::Continue
    }
}

pub fn run(session: Session) -> Result<()> {
    let mut dashboard = Dashboard::new(session);
    run_report_view(&mut dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::report::view::tests::buffer_text;
    use crate::loader::load_reader;
    use crate::models::Selection;
    use chrono::{Month, NaiveDate};
    use ratatui::{backend::TestBackend, Terminal};

    const CSV: &str = "\
Date,Folder,Read Status,Email Count
2023-11-02,Inbox,Read,4
2024-01-05,Inbox,Read,10
2024-01-05,Inbox,Unread,5
2024-01-10,Spam,Unread,3
2024-02-10,Spam,Read,2
";

    fn dashboard() -> Dashboard {
        let ds = load_reader(CSV.as_bytes(), "mail.csv").unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        Dashboard::new(Session::new(ds, today).unwrap())
    }

    fn screen(d: &mut Dashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| d.draw(f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn type_str(d: &mut Dashboard, s: &str) {
        for c in s.chars() {
            d.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_initial_screen_shows_default_selection() {
        let mut d = dashboard();
        let text = screen(&mut d);
        assert!(text.contains("mail.csv"));
        assert!(text.contains(" 2024 "));
        assert!(text.contains(" January "));
        assert!(text.contains("Email Status by Folder for January 2024"));
        assert!(text.contains("Year-to-Date Totals for 2024"));
        assert!(!text.contains("Cumulative Monthly"));
    }

    #[test]
    fn test_arrow_keys_step_through_offered_periods() {
        let mut d = dashboard();
        d.handle_key(KeyCode::Down);
        assert_eq!(d.session.selection(), Selection::new(2023, Month::January));
        // 2023 has no January rows.
        assert!(matches!(d.artifacts, Some(Artifacts::NoData(_))));
        assert!(screen(&mut d).contains("No data for January 2023."));

        d.handle_key(KeyCode::Right);
        assert_eq!(d.session.selection(), Selection::new(2023, Month::February));
        d.handle_key(KeyCode::Up);
        assert_eq!(d.session.selection(), Selection::new(2024, Month::February));
        assert!(matches!(d.artifacts, Some(Artifacts::Report(_))));

        d.handle_key(KeyCode::Left);
        d.handle_key(KeyCode::Left);
        assert_eq!(d.session.selection().month, Month::January);
    }

    #[test]
    fn test_line_chart_toggle() {
        let mut d = dashboard();
        d.handle_key(KeyCode::Char('l'));
        assert!(screen(&mut d).contains("Cumulative Monthly"));
        d.handle_key(KeyCode::Char('l'));
        assert!(!screen(&mut d).contains("Cumulative Monthly"));
    }

    #[test]
    fn test_open_prompt_loads_replacement_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(
            &path,
            "Date,Folder,Read Status,Email Count\n2022-05-01,Work,Read,7\n",
        )
        .unwrap();

        let mut d = dashboard();
        d.handle_key(KeyCode::Char('o'));
        assert!(screen(&mut d).contains("Open CSV:"));
        type_str(&mut d, path.to_str().unwrap());
        d.handle_key(KeyCode::Enter);

        assert!(d.input.is_none());
        assert_eq!(d.session.dataset().source, "other.csv");
        assert_eq!(d.session.selection(), Selection::new(2022, Month::May));
        let text = screen(&mut d);
        assert!(text.contains("Data successfully loaded from other.csv"));
        assert!(text.contains("Email Status by Folder for May 2022"));
    }

    #[test]
    fn test_failed_open_keeps_current_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Date,Folder,Read Status\n2024-01-05,Inbox,Read\n").unwrap();

        let mut d = dashboard();
        d.handle_key(KeyCode::Char('o'));
        type_str(&mut d, path.to_str().unwrap());
        d.handle_key(KeyCode::Enter);

        assert_eq!(d.session.dataset().source, "mail.csv");
        assert!(matches!(d.status, Some(StatusMessage::Error(_))));
        assert!(screen(&mut d).contains("missing required column"));
    }

    #[test]
    fn test_open_rejects_files_without_csv_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(
            &path,
            "Date,Folder,Read Status,Email Count\n2022-05-01,Work,Read,7\n",
        )
        .unwrap();

        let mut d = dashboard();
        d.handle_key(KeyCode::Char('o'));
        type_str(&mut d, path.to_str().unwrap());
        d.handle_key(KeyCode::Enter);

        assert_eq!(d.session.dataset().source, "mail.csv");
        assert!(matches!(d.status, Some(StatusMessage::Error(_))));
        assert!(screen(&mut d).contains("is not a CSV file"));
    }

    #[test]
    fn test_csv_extension_check_ignores_case() {
        assert!(has_csv_extension(Path::new("/tmp/mail.csv")));
        assert!(has_csv_extension(Path::new("EXPORT.CSV")));
        assert!(!has_csv_extension(Path::new("notes.txt")));
        assert!(!has_csv_extension(Path::new("csv")));
    }

    #[test]
    fn test_escape_cancels_prompt_then_quits() {
        let mut d = dashboard();
        d.handle_key(KeyCode::Char('o'));
        // 'q' is text while the prompt is open.
        assert!(matches!(d.handle_key(KeyCode::Char('q')), ReportViewAction::Continue));
        assert!(matches!(d.handle_key(KeyCode::Esc), ReportViewAction::Continue));
        assert!(d.input.is_none());
        assert!(matches!(d.handle_key(KeyCode::Char('q')), ReportViewAction::Close));
    }
}
