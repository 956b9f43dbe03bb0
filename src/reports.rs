use std::collections::BTreeMap;

use chrono::Month;

use crate::error::{ReportError, Result};
use crate::models::{Dataset, EmailRecord, ReadStatus};

// Sums use plain addition: the loader rejects any file whose grand total
// overflows `u64`, so no subset of a loaded dataset can.

/// Summed email counts keyed by (folder, status).
pub type FolderStatusAggregate = BTreeMap<(String, ReadStatus), u64>;

/// Summed email counts keyed by folder, across statuses.
pub type FolderTotals = BTreeMap<String, u64>;

fn group_by_folder_status<'a>(
    records: impl Iterator<Item = &'a EmailRecord>,
) -> FolderStatusAggregate {
    let mut agg = FolderStatusAggregate::new();
    for r in records {
        *agg.entry((r.folder.clone(), r.read_status)).or_insert(0) += r.email_count;
    }
    agg
}

// ---------------------------------------------------------------------------
// Selected month
// ---------------------------------------------------------------------------

/// Folder/status counts for one month. An empty period is reported as
/// `EmptySelection` so callers can show a notice instead of an empty chart.
pub fn monthly_folder_status(
    dataset: &Dataset,
    year: i32,
    month: Month,
) -> Result<FolderStatusAggregate> {
    let agg = group_by_folder_status(dataset.for_period(year, month));
    if agg.is_empty() {
        return Err(ReportError::EmptySelection { year, month });
    }
    Ok(agg)
}

// ---------------------------------------------------------------------------
// Year to date
// ---------------------------------------------------------------------------

pub fn ytd_folder_status(dataset: &Dataset, year: i32) -> FolderStatusAggregate {
    group_by_folder_status(dataset.for_year(year))
}

pub fn ytd_folder_totals(dataset: &Dataset, year: i32) -> FolderTotals {
    let mut totals = FolderTotals::new();
    for r in dataset.for_year(year) {
        *totals.entry(r.folder.clone()).or_insert(0) += r.email_count;
    }
    totals
}

// ---------------------------------------------------------------------------
// Monthly totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthTotal {
    /// Month number, 1-12.
    pub month: u32,
    pub total: u64,
    pub cumulative: u64,
}

/// Per-month totals for a year, ascending by month, with a running sum.
pub fn monthly_totals(dataset: &Dataset, year: i32) -> Vec<MonthTotal> {
    let mut by_month: BTreeMap<u32, u64> = BTreeMap::new();
    for r in dataset.for_year(year) {
        *by_month.entry(r.month()).or_insert(0) += r.email_count;
    }

    let mut running = 0u64;
    by_month
        .into_iter()
        .map(|(month, total)| {
            running += total;
            MonthTotal {
                month,
                total,
                cumulative: running,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(y: i32, m: u32, d: u32, folder: &str, status: ReadStatus, n: u64) -> EmailRecord {
        EmailRecord::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), folder, status, n)
    }

    fn seed() -> Dataset {
        use ReadStatus::*;
        Dataset::new(
            "seed",
            vec![
                rec(2024, 1, 5, "Inbox", Read, 10),
                rec(2024, 1, 5, "Inbox", Unread, 5),
                rec(2024, 1, 10, "Spam", Unread, 3),
                rec(2024, 1, 20, "Inbox", Read, 2),
                rec(2024, 3, 1, "Inbox", Read, 7),
                rec(2024, 3, 2, "Sent", Read, 4),
                rec(2023, 12, 31, "Inbox", Unread, 100),
            ],
        )
    }

    fn year_total(ds: &Dataset, year: i32) -> u64 {
        ds.for_year(year).map(|r| r.email_count).sum()
    }

    #[test]
    fn test_monthly_folder_status_example() {
        let ds = Dataset::new(
            "example",
            vec![
                rec(2024, 1, 5, "Inbox", ReadStatus::Read, 10),
                rec(2024, 1, 5, "Inbox", ReadStatus::Unread, 5),
                rec(2024, 1, 10, "Spam", ReadStatus::Unread, 3),
            ],
        );
        let agg = monthly_folder_status(&ds, 2024, Month::January).unwrap();
        assert_eq!(agg.len(), 3);
        assert_eq!(agg[&("Inbox".to_string(), ReadStatus::Read)], 10);
        assert_eq!(agg[&("Inbox".to_string(), ReadStatus::Unread)], 5);
        assert_eq!(agg[&("Spam".to_string(), ReadStatus::Unread)], 3);
    }

    #[test]
    fn test_monthly_folder_status_sums_match_filtered_rows() {
        let ds = seed();
        let agg = monthly_folder_status(&ds, 2024, Month::January).unwrap();
        assert_eq!(agg[&("Inbox".to_string(), ReadStatus::Read)], 12);
        let filtered: u64 = ds.for_period(2024, Month::January).map(|r| r.email_count).sum();
        assert_eq!(agg.values().sum::<u64>(), filtered);
    }

    #[test]
    fn test_monthly_folder_status_empty_selection() {
        let ds = seed();
        let err = monthly_folder_status(&ds, 2030, Month::March).unwrap_err();
        assert!(matches!(
            err,
            ReportError::EmptySelection {
                year: 2030,
                month: Month::March
            }
        ));
        assert_eq!(err.to_string(), "No data for March 2030");
    }

    #[test]
    fn test_ytd_folder_status_scoped_to_year() {
        let ds = seed();
        let agg = ytd_folder_status(&ds, 2024);
        assert_eq!(agg[&("Inbox".to_string(), ReadStatus::Read)], 19);
        assert_eq!(agg[&("Inbox".to_string(), ReadStatus::Unread)], 5);
        assert_eq!(agg.values().sum::<u64>(), year_total(&ds, 2024));
    }

    #[test]
    fn test_ytd_folder_totals_sum_to_year_total() {
        let ds = seed();
        let totals = ytd_folder_totals(&ds, 2024);
        assert_eq!(totals["Inbox"], 24);
        assert_eq!(totals["Spam"], 3);
        assert_eq!(totals["Sent"], 4);
        assert_eq!(totals.values().sum::<u64>(), year_total(&ds, 2024));
        assert_eq!(ytd_folder_totals(&ds, 2023)["Inbox"], 100);
    }

    #[test]
    fn test_monthly_totals_cumulative() {
        let ds = seed();
        let months = monthly_totals(&ds, 2024);
        assert_eq!(
            months,
            vec![
                MonthTotal {
                    month: 1,
                    total: 20,
                    cumulative: 20,
                },
                MonthTotal {
                    month: 3,
                    total: 11,
                    cumulative: 31,
                },
            ]
        );
        assert!(months.windows(2).all(|w| w[0].cumulative <= w[1].cumulative));
        assert_eq!(months.last().unwrap().cumulative, year_total(&ds, 2024));
    }

    #[test]
    fn test_monthly_totals_sorted_regardless_of_input_order() {
        use ReadStatus::*;
        let ds = Dataset::new(
            "unsorted",
            vec![
                rec(2024, 9, 1, "Inbox", Read, 1),
                rec(2024, 2, 1, "Inbox", Read, 2),
                rec(2024, 5, 1, "Inbox", Unread, 3),
            ],
        );
        let months: Vec<u32> = monthly_totals(&ds, 2024).iter().map(|m| m.month).collect();
        assert_eq!(months, vec![2, 5, 9]);
        assert!(monthly_totals(&ds, 2023).is_empty());
    }

    #[test]
    fn test_aggregates_are_idempotent() {
        let ds = seed();
        assert_eq!(
            monthly_folder_status(&ds, 2024, Month::March).unwrap(),
            monthly_folder_status(&ds, 2024, Month::March).unwrap()
        );
        assert_eq!(ytd_folder_status(&ds, 2024), ytd_folder_status(&ds, 2024));
        assert_eq!(ytd_folder_totals(&ds, 2024), ytd_folder_totals(&ds, 2024));
        assert_eq!(monthly_totals(&ds, 2024), monthly_totals(&ds, 2024));
    }
}
