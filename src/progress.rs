// src/progress.rs
use chrono::NaiveDate;

/// Lightweight progress reporting used by long-running operations (ingest/export).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one day has been fetched (or read from cache) and extracted.
    fn item_done(&mut self, _day: NaiveDate, _rows: usize) {}

    /// Called when a day produced no rows because of a fetch or table failure.
    fn item_failed(&mut self, _day: NaiveDate, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
