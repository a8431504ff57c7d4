// src/data.rs
//
// Canonical row types flowing through the pipeline.
//
// - ChartRow:      one extracted chart entry; immutable after extraction.
// - Dataset:       all rows for one region over the requested range, (day, rank) ordered.
// - TrackSummary / ArtistSummary: derived, recomputed wholesale from a Dataset.
// - MergedRecord:  source/target TrackSummary pair surviving the crossover join.
// - LabeledRow:    standardized features + label handed to the classifier.
//
// Every type that gets exported implements `Tabular` so the CSV layer can
// stay generic over headers + string cells.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FMT: &str = "%Y-%m-%d";

/// Geographic chart scope, e.g. `us` or `gb`. Always stored lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Region(String);

impl Region {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_ascii_lowercase())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Region {
    fn from(s: String) -> Self { Region::new(&s) }
}

impl From<Region> for String {
    fn from(r: Region) -> Self { r.0 }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Header row + string cells, the shape the CSV export writes.
pub trait Tabular {
    const HEADERS: &'static [&'static str];
    fn to_record(&self) -> Vec<String>;

    fn headers() -> Vec<String> {
        Self::HEADERS.iter().map(|h| s!(*h)).collect()
    }
}

/// Grouping key for a track: title plus artist, so same-titled songs by
/// different artists stay apart.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackKey {
    pub track: String,
    pub artist: String,
}

impl TrackKey {
    pub fn new(track: &str, artist: &str) -> Self {
        Self { track: s!(track), artist: s!(artist) }
    }
}

/// Serde names match `HEADERS`, so the day cache reads and writes the same
/// columns the CSV export does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChartRow {
    pub rank: u32,
    pub track: String,
    pub artist: String,
    pub streams: u64,
    #[serde(rename = "Date")]
    pub day: NaiveDate,
}

impl ChartRow {
    pub fn key(&self) -> TrackKey {
        TrackKey::new(&self.track, &self.artist)
    }
}

impl Tabular for ChartRow {
    const HEADERS: &'static [&'static str] = &["Rank", "Track", "Artist", "Streams", "Date"];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.track.clone(),
            self.artist.clone(),
            self.streams.to_string(),
            self.day.format(DATE_FMT).to_string(),
        ]
    }
}

/// Ordered rows for one region. Built by the ingester in (day, rank) order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    pub region: Region,
    pub rows: Vec<ChartRow>,
}

impl Dataset {
    pub fn new(region: Region) -> Self {
        Self { region, rows: Vec::new() }
    }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// True when rows are sorted by (day, rank) ascending.
    pub fn is_ordered(&self) -> bool {
        self.rows.windows(2).all(|w| (w[0].day, w[0].rank) < (w[1].day, w[1].rank))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackSummary {
    pub track: String,
    pub artist: String,
    pub highest_ranking: u32,
    /// Whole days from first to last appearance, inclusive. Gaps are not subtracted.
    pub time_up: i64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl TrackSummary {
    pub fn key(&self) -> TrackKey {
        TrackKey::new(&self.track, &self.artist)
    }
}

impl Tabular for TrackSummary {
    const HEADERS: &'static [&'static str] =
        &["Track", "Artist", "Highest ranking", "Time up", "First date", "Last date"];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.track.clone(),
            self.artist.clone(),
            self.highest_ranking.to_string(),
            self.time_up.to_string(),
            self.first_date.format(DATE_FMT).to_string(),
            self.last_date.format(DATE_FMT).to_string(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistSummary {
    pub artist: String,
    pub distinct_song_count: usize,
    /// One unit per (track, day) appearance.
    pub total_listing_count: usize,
}

impl Tabular for ArtistSummary {
    const HEADERS: &'static [&'static str] = &["Artist", "Distinct songs", "Total listings"];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.artist.clone(),
            self.distinct_song_count.to_string(),
            self.total_listing_count.to_string(),
        ]
    }
}

/// Region-qualified side of a merged record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionStats {
    pub region: Region,
    pub highest_ranking: u32,
    pub time_up: i64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl From<(&Region, &TrackSummary)> for RegionStats {
    fn from((region, t): (&Region, &TrackSummary)) -> Self {
        Self {
            region: region.clone(),
            highest_ranking: t.highest_ranking,
            time_up: t.time_up,
            first_date: t.first_date,
            last_date: t.last_date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedRecord {
    pub track: String,
    /// Carried from the source side; the target-side artist is dropped.
    pub artist: String,
    pub source: RegionStats,
    pub target: RegionStats,
}

/// Column names are namespaced by the two region codes, e.g. `us_first_date`.
pub fn merged_headers(source: &Region, target: &Region) -> Vec<String> {
    let mut h = vec![s!("track"), s!("artist")];
    for r in [source, target] {
        for f in ["highest_ranking", "time_up", "first_date", "last_date"] {
            h.push(join!(r.as_str(), "_", f));
        }
    }
    h
}

impl MergedRecord {
    pub fn headers(&self) -> Vec<String> {
        merged_headers(&self.source.region, &self.target.region)
    }

    pub fn to_record(&self) -> Vec<String> {
        let mut out = vec![self.track.clone(), self.artist.clone()];
        for side in [&self.source, &self.target] {
            out.push(side.highest_ranking.to_string());
            out.push(side.time_up.to_string());
            out.push(side.first_date.format(DATE_FMT).to_string());
            out.push(side.last_date.format(DATE_FMT).to_string());
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabeledRow {
    pub track: String,
    pub artist: String,
    pub z_ranking: f64,
    pub z_time: f64,
    /// Track observed anywhere in the target region's Dataset.
    pub label: bool,
}

impl LabeledRow {
    pub fn key(&self) -> TrackKey {
        TrackKey::new(&self.track, &self.artist)
    }
    pub fn features(&self) -> [f64; 2] {
        [self.z_ranking, self.z_time]
    }
}

impl Tabular for LabeledRow {
    const HEADERS: &'static [&'static str] = &["Track", "Artist", "Z ranking", "Z time", "Label"];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.track.clone(),
            self.artist.clone(),
            format!("{:.6}", self.z_ranking),
            format!("{:.6}", self.z_time),
            self.label.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, d).unwrap()
    }

    #[test]
    fn region_is_lowercased() {
        assert_eq!(Region::new(" US ").as_str(), "us");
    }

    #[test]
    fn merged_headers_are_region_qualified() {
        let h = merged_headers(&Region::new("us"), &Region::new("gb"));
        assert_eq!(h.len(), 10);
        assert_eq!(h[2], "us_highest_ranking");
        assert_eq!(h[9], "gb_last_date");
    }

    #[test]
    fn ordering_check_detects_out_of_order_rows() {
        let mut ds = Dataset::new(Region::new("us"));
        for (r, d) in [(1, 1), (2, 1), (1, 2)] {
            ds.rows.push(ChartRow { rank: r, track: s!("t"), artist: s!("a"), streams: 1, day: day(d) });
        }
        assert!(ds.is_ordered());
        ds.rows.swap(0, 2);
        assert!(!ds.is_ordered());
    }
}
