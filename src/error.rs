// src/error.rs
use chrono::NaiveDate;
use thiserror::Error;

use crate::data::Region;

pub type Result<T> = std::result::Result<T, ChartError>;

/// Everything that can go wrong between fetching a chart page and scoring a model.
///
/// `Fetch` and `MissingTable` are per-day outcomes: the ingester downgrades them
/// to "no rows for this day" and keeps sweeping. `MalformedRow` is per-row and
/// only ever logged. `DegenerateInput` aborts feature construction.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("fetch failed for {region} on {day}: {reason}")]
    Fetch { region: Region, day: NaiveDate, reason: String },

    #[error("no chart table on page for {region} on {day}")]
    MissingTable { region: Region, day: NaiveDate },

    #[error("malformed row (rank {rank}) on {day}: no track/artist separator in {cell:?}")]
    MalformedRow { day: NaiveDate, rank: u32, cell: String },

    #[error("cannot standardize {feature}: {reason}")]
    DegenerateInput { feature: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("parse error in {origin}: {reason}")]
    Parse { origin: String, reason: String },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("http client: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChartError {
    /// Per-day failures the ingester converts into an empty day.
    pub fn is_day_gap(&self) -> bool {
        matches!(self, ChartError::Fetch { .. } | ChartError::MissingTable { .. })
    }
}
