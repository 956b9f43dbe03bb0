use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{ReportError, Result};
use crate::models::{Dataset, EmailRecord, ReadStatus};

pub const COL_DATE: &str = "Date";
pub const COL_FOLDER: &str = "Folder";
pub const COL_STATUS: &str = "Read Status";
pub const COL_COUNT: &str = "Email Count";

const REQUIRED_COLUMNS: [&str; 4] = [COL_DATE, COL_FOLDER, COL_STATUS, COL_COUNT];

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO date or timestamp, a US-style `MM/DD/YYYY` date, or a date
/// with a month name such as `Jan 5, 2024` or `5 January 2024`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

/// Parse a non-negative whole count. `12.0` is accepted since spreadsheet
/// exports often write integers as floats.
pub fn parse_count(raw: &str) -> Option<u64> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let f: f64 = s.parse().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

struct ColumnIndex {
    date: usize,
    folder: usize,
    status: usize,
    count: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let find = |col: &str| -> Result<usize> {
            names.iter().position(|n| n == col).ok_or_else(|| {
                ReportError::MalformedInput(format!(
                    "missing required column `{col}` (expected: {})",
                    REQUIRED_COLUMNS.join(", ")
                ))
            })
        };
        Ok(Self {
            date: find(COL_DATE)?,
            folder: find(COL_FOLDER)?,
            status: find(COL_STATUS)?,
            count: find(COL_COUNT)?,
        })
    }

    fn width(&self) -> usize {
        [self.date, self.folder, self.status, self.count]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

fn malformed(line: u64, msg: String) -> ReportError {
    ReportError::MalformedInput(format!("line {line}: {msg}"))
}

fn parse_record(idx: &ColumnIndex, record: &csv::StringRecord, line: u64) -> Result<EmailRecord> {
    if record.len() < idx.width() {
        return Err(malformed(
            line,
            format!("expected at least {} fields, found {}", idx.width(), record.len()),
        ));
    }

    let raw_date = &record[idx.date];
    let date = parse_date(raw_date)
        .ok_or_else(|| malformed(line, format!("unparseable date `{}`", raw_date.trim())))?;

    let folder = record[idx.folder].trim();
    if folder.is_empty() {
        return Err(malformed(line, "empty folder name".to_string()));
    }

    let status: ReadStatus = record[idx.status]
        .parse()
        .map_err(|e: ReportError| malformed(line, e.to_string()))?;

    let raw_count = &record[idx.count];
    let count = parse_count(raw_count).ok_or_else(|| {
        malformed(
            line,
            format!("email count `{}` is not a non-negative integer", raw_count.trim()),
        )
    })?;

    Ok(EmailRecord::new(date, folder, status, count))
}

/// Parse CSV text into a dataset. Any bad row fails the whole load.
pub fn load_reader<R: Read>(reader: R, source: &str) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let idx = ColumnIndex::from_headers(rdr.headers()?)?;

    let mut records = Vec::new();
    let mut total = 0u64;
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let parsed = parse_record(&idx, &record, line)?;
        total = total.checked_add(parsed.email_count).ok_or_else(|| {
            malformed(line, "email counts add up past the supported total".to_string())
        })?;
        records.push(parsed);
    }

    if records.is_empty() {
        return Err(ReportError::MalformedInput(format!(
            "{source} has a header but no data rows"
        )));
    }

    log::debug!("parsed {} rows from {source}", records.len());
    Ok(Dataset::new(source, records))
}

/// The label a file's dataset is shown under: its file name.
pub fn source_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

pub fn load_file(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    load_reader(std::io::BufReader::new(file), &source_label(path))
}
