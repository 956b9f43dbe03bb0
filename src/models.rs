use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDate};

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadStatus {
    Read,
    Unread,
}

impl ReadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Unread => "Unread",
        }
    }
}

impl fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReadStatus {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "unread" => Ok(Self::Unread),
            _ => Err(ReportError::MalformedInput(format!(
                "unknown read status `{}` (expected Read or Unread)",
                s.trim()
            ))),
        }
    }
}

/// One CSV row. `year` and `month` are derived from `date` and cannot be set
/// independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecord {
    pub date: NaiveDate,
    pub folder: String,
    pub read_status: ReadStatus,
    pub email_count: u64,
    year: i32,
    month: u32,
}

impl EmailRecord {
    pub fn new(
        date: NaiveDate,
        folder: impl Into<String>,
        read_status: ReadStatus,
        email_count: u64,
    ) -> Self {
        Self {
            date,
            folder: folder.into(),
            read_status,
            email_count,
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month number, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn in_period(&self, year: i32, month: Month) -> bool {
        self.year == year && self.month == month.number_from_month()
    }
}

/// All records from one load, in input order. The sum of all counts fits in
/// a `u64`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: String,
    pub records: Vec<EmailRecord>,
}

impl Dataset {
    pub fn new(source: impl Into<String>, records: Vec<EmailRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn for_year(&self, year: i32) -> impl Iterator<Item = &EmailRecord> {
        self.records.iter().filter(move |r| r.year() == year)
    }

    pub fn for_period(&self, year: i32, month: Month) -> impl Iterator<Item = &EmailRecord> {
        self.records.iter().filter(move |r| r.in_period(year, month))
    }
}

/// A concrete (year, month) filter chosen through the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub year: i32,
    pub month: Month,
}

impl Selection {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year)
    }
}

/// Month number (1-12) to `chrono::Month`.
pub fn month_from_number(n: u32) -> Option<Month> {
    u8::try_from(n).ok().and_then(|n| Month::try_from(n).ok())
}
