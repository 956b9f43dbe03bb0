use std::collections::BTreeSet;

use chrono::{Datelike, Month, NaiveDate};

use crate::error::{ReportError, Result};
use crate::models::{month_from_number, Dataset, Selection};

/// The year and month choices offered for a dataset, with defaults chosen
/// relative to `today`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOptions {
    /// Distinct years, most recent first.
    pub years: Vec<i32>,
    /// Distinct months across all years, December first.
    pub months: Vec<Month>,
    pub default_year_index: usize,
    pub default_month_index: usize,
}

impl TimeOptions {
    pub fn from_dataset(dataset: &Dataset, today: NaiveDate) -> Self {
        let years: BTreeSet<i32> = dataset.records.iter().map(|r| r.year()).collect();
        let month_numbers: BTreeSet<u32> = dataset.records.iter().map(|r| r.month()).collect();

        let years: Vec<i32> = years.into_iter().rev().collect();
        let months: Vec<Month> = month_numbers
            .into_iter()
            .rev()
            .filter_map(month_from_number)
            .collect();

        let default_year_index = years.iter().position(|&y| y == today.year()).unwrap_or(0);
        let default_month_index = months
            .iter()
            .position(|m| m.number_from_month() == today.month())
            .unwrap_or(0);

        Self {
            years,
            months,
            default_year_index,
            default_month_index,
        }
    }

    pub fn month_names(&self) -> Vec<&'static str> {
        self.months.iter().map(|m| m.name()).collect()
    }

    /// `None` only for an empty dataset, which the loader never produces.
    pub fn default_selection(&self) -> Option<Selection> {
        let year = *self.years.get(self.default_year_index)?;
        let month = *self.months.get(self.default_month_index)?;
        Some(Selection::new(year, month))
    }

    /// Resolve a chosen year and month name to a selection, rejecting values
    /// that are not on offer.
    pub fn resolve(&self, year: i32, month_name: &str) -> Result<Selection> {
        if !self.years.contains(&year) {
            return Err(ReportError::InvalidSelection(format!(
                "year {year} is not in the data (available: {})",
                join(self.years.iter().map(|y| y.to_string()))
            )));
        }
        let month = parse_month_name(month_name).ok_or_else(|| {
            ReportError::InvalidSelection(format!("`{}` is not a month name", month_name.trim()))
        })?;
        if !self.months.contains(&month) {
            return Err(ReportError::InvalidSelection(format!(
                "{} is not in the data (available: {})",
                month.name(),
                join(self.month_names().into_iter().map(str::to_string))
            )));
        }
        Ok(Selection::new(year, month))
    }

    pub fn contains(&self, selection: &Selection) -> bool {
        self.years.contains(&selection.year) && self.months.contains(&selection.month)
    }

    // Dropdown stepping. Lists are most-recent-first, so "next" moves toward
    // older values, clamped at either end.

    pub fn step_year(&self, current: i32, delta: i32) -> i32 {
        step(&self.years, &current, delta).unwrap_or(current)
    }

    pub fn step_month(&self, current: Month, delta: i32) -> Month {
        step(&self.months, &current, delta).unwrap_or(current)
    }
}

fn step<T: PartialEq + Copy>(items: &[T], current: &T, delta: i32) -> Option<T> {
    let pos = items.iter().position(|i| i == current)? as i64;
    let last = items.len().checked_sub(1)? as i64;
    let next = (pos + delta as i64).clamp(0, last) as usize;
    items.get(next).copied()
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

/// Calendar name lookup: full English names or three-letter abbreviations,
/// case-insensitive.
pub fn parse_month_name(name: &str) -> Option<Month> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    (1..=12).filter_map(month_from_number).find(|m| {
        let full = m.name();
        full.eq_ignore_ascii_case(name) || (name.len() == 3 && full[..3].eq_ignore_ascii_case(name))
    })
}
