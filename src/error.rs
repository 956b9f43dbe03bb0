use chrono::Month;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("No data for {} {year}", .month.name())]
    EmptySelection { year: i32, month: Month },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
