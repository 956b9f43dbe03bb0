use chrono::{Datelike, Months, NaiveDate};

use crate::cli::OutputMode;
use crate::error::Result;
use crate::models::{Dataset, EmailRecord, ReadStatus};
use crate::session::Session;

pub const DEMO_SOURCE: &str = "demo data";

/// Months of history generated, ending with the current month.
const MONTHS: u32 = 14;

/// Days of the month a tally is recorded on.
const TALLY_DAYS: &[u32] = &[1, 8, 15, 22];

struct DemoFolder {
    name: &'static str,
    /// Typical emails per tally.
    base: u64,
    /// Percentage of those left unread.
    unread_pct: u64,
}

const FOLDERS: &[DemoFolder] = &[
    DemoFolder {
        name: "Inbox",
        base: 42,
        unread_pct: 15,
    },
    DemoFolder {
        name: "Promotions",
        base: 30,
        unread_pct: 70,
    },
    DemoFolder {
        name: "Social",
        base: 18,
        unread_pct: 35,
    },
    DemoFolder {
        name: "Spam",
        base: 12,
        unread_pct: 95,
    },
    DemoFolder {
        name: "Archive",
        base: 9,
        unread_pct: 0,
    },
];

/// A deterministic sample: counts vary with the month and day so the charts
/// have some shape, but every run on the same day is identical.
pub fn sample_dataset(today: NaiveDate) -> Dataset {
    let first = today.with_day(1).unwrap_or(today);
    let mut records = Vec::new();

    for back in (0..MONTHS).rev() {
        let Some(month_start) = first.checked_sub_months(Months::new(back)) else {
            continue;
        };
        let seasonal = (month_start.month() as u64 * 7) % 11;

        for (d, &day) in TALLY_DAYS.iter().enumerate() {
            let Some(date) = month_start.with_day(day) else {
                continue;
            };
            if date > today {
                break;
            }
            for (f, folder) in FOLDERS.iter().enumerate() {
                let wobble = (seasonal + d as u64 * 5 + f as u64 * 3) % 13;
                let total = folder.base + wobble;
                let unread = total * folder.unread_pct / 100;
                let read = total - unread;
                if read > 0 {
                    records.push(EmailRecord::new(date, folder.name, ReadStatus::Read, read));
                }
                if unread > 0 {
                    records.push(EmailRecord::new(date, folder.name, ReadStatus::Unread, unread));
                }
            }
        }
    }

    log::debug!("generated {} demo records", records.len());
    Dataset::new(DEMO_SOURCE, records)
}

pub fn run(today: NaiveDate, line_chart: bool, mode: Option<OutputMode>) -> Result<()> {
    let mut session = Session::new(sample_dataset(today), today)?;
    session.render_options.show_line_chart = line_chart;
    super::report::dispatch(session, mode)
}
