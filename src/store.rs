// src/store.rs
//
// Day cache: one CSV per (region, date) under `<store_dir>/<region>/`.
// Only non-empty extractions are saved, so gaps are retried on the next run.
//
// File layout:
//   # malformed=1 skipped=0
//   Rank,Track,Artist,Streams,Date
//   1,God's Plan,Drake,3021432,2018-01-20
//   ...

use std::{collections::HashSet, fs, io::{BufWriter, Write}, path::PathBuf};

use chrono::NaiveDate;

use crate::config::consts::STORE_SEP;
use crate::data::{ChartRow, DATE_FMT, Region};
use crate::error::{ChartError, Result};
use crate::specs::chart::Extraction;

const COUNTS_PREFIX: &str = "# ";

#[derive(Clone, Debug)]
pub struct DayCache {
    root: PathBuf,
}

impl DayCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, region: &Region, day: NaiveDate) -> PathBuf {
        self.root
            .join(region.as_str())
            .join(join!(&day.format(DATE_FMT).to_string(), ".csv"))
    }

    /// `Ok(None)` when nothing is cached for that day.
    ///
    /// A file whose rows belong to another day, or that repeats a rank, is an
    /// error like any other unreadable entry.
    pub fn load(&self, region: &Region, day: NaiveDate) -> Result<Option<Extraction>> {
        let path = self.path_for(region, day);
        if !path.exists() {
            return Ok(None);
        }
        let bad = |reason: String| ChartError::Parse { origin: path.display().to_string(), reason };

        let text = fs::read_to_string(&path)?;
        let (malformed, skipped) = read_counts(&text).ok_or_else(|| bad(s!("missing row counts line")))?;

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(STORE_SEP)
            .comment(Some(b'#'))
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        let mut ranks: HashSet<u32> = HashSet::new();
        for rec in rdr.deserialize::<ChartRow>() {
            let row = rec?;
            if row.day != day {
                return Err(bad(format!("row for {} in the file for {day}", row.day)));
            }
            if !ranks.insert(row.rank) {
                return Err(bad(format!("rank {} repeated", row.rank)));
            }
            rows.push(row);
        }
        rows.sort_by_key(|r| r.rank);
        Ok(Some(Extraction { rows, malformed, skipped }))
    }

    pub fn save(&self, region: &Region, day: NaiveDate, extraction: &Extraction) -> Result<PathBuf> {
        let path = self.path_for(region, day);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(fs::File::create(&path)?);
        writeln!(out, "{COUNTS_PREFIX}malformed={} skipped={}", extraction.malformed, extraction.skipped)?;

        let mut wtr = csv::WriterBuilder::new().delimiter(STORE_SEP).from_writer(out);
        for row in &extraction.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(path)
    }
}

/// `(malformed, skipped)` from the leading comment line.
fn read_counts(text: &str) -> Option<(usize, usize)> {
    let line = text.lines().next()?.strip_prefix(COUNTS_PREFIX)?;
    let (mut malformed, mut skipped) = (None, None);
    for kv in line.split_whitespace() {
        match kv.split_once('=') {
            Some(("malformed", v)) => malformed = v.parse().ok(),
            Some(("skipped", v)) => skipped = v.parse().ok(),
            _ => {}
        }
    }
    Some((malformed?, skipped?))
}
