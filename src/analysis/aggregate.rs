// src/analysis/aggregate.rs
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::data::{ArtistSummary, Dataset, TrackKey, TrackSummary};

/// Per artist: distinct (track) count and total (track, day) listings.
/// Sorted by distinct songs, then listings, both descending; ties by name.
pub fn artist_summaries(ds: &Dataset) -> Vec<ArtistSummary> {
    let mut by_artist: BTreeMap<&str, (BTreeSet<&str>, usize)> = BTreeMap::new();
    for row in &ds.rows {
        let entry = by_artist.entry(row.artist.as_str()).or_default();
        entry.0.insert(row.track.as_str());
        entry.1 += 1;
    }

    let mut out: Vec<ArtistSummary> = by_artist
        .into_iter()
        .map(|(artist, (tracks, listings))| ArtistSummary {
            artist: s!(artist),
            distinct_song_count: tracks.len(),
            total_listing_count: listings,
        })
        .collect();
    out.sort_by(|a, b| {
        b.distinct_song_count
            .cmp(&a.distinct_song_count)
            .then(b.total_listing_count.cmp(&a.total_listing_count))
            .then_with(|| a.artist.cmp(&b.artist))
    });
    out
}

struct TrackAcc {
    best: u32,
    first: NaiveDate,
    last: NaiveDate,
}

/// One summary per (track, artist), ordered by track then artist.
///
/// `time_up` spans first to last appearance inclusive; days the track was
/// off the chart in between still count.
pub fn track_summaries(ds: &Dataset) -> Vec<TrackSummary> {
    let mut by_track: BTreeMap<TrackKey, TrackAcc> = BTreeMap::new();
    for row in &ds.rows {
        by_track
            .entry(row.key())
            .and_modify(|acc| {
                acc.best = acc.best.min(row.rank);
                acc.first = acc.first.min(row.day);
                acc.last = acc.last.max(row.day);
            })
            .or_insert(TrackAcc { best: row.rank, first: row.day, last: row.day });
    }

    by_track
        .into_iter()
        .map(|(key, acc)| TrackSummary {
            track: key.track,
            artist: key.artist,
            highest_ranking: acc.best,
            time_up: (acc.last - acc.first).num_days() + 1,
            first_date: acc.first,
            last_date: acc.last,
        })
        .collect()
}
