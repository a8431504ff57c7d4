// src/analysis/join.rs
use std::collections::HashMap;

use crate::data::{MergedRecord, Region, RegionStats, TrackSummary};

#[derive(Clone, Debug, Default)]
pub struct JoinReport {
    pub records: Vec<MergedRecord>,
    /// Title matches before the date filter.
    pub candidate_pairs: usize,
    /// Matches where the source did not chart strictly first.
    pub not_earlier: usize,
    /// Source tracks whose title matched more than one target summary.
    pub ambiguous_tracks: usize,
}

/// Pair source and target summaries that share a track title and keep those
/// where the source region charted strictly first.
///
/// Matching is on the title alone: the source artist is carried over and the
/// target artist is dropped, so like-named songs by different artists merge.
/// Each such multi-match is counted in `ambiguous_tracks` and logged.
pub fn join_crossover(
    source_region: &Region,
    source: &[TrackSummary],
    target_region: &Region,
    target: &[TrackSummary],
) -> JoinReport {
    let mut by_title: HashMap<&str, Vec<&TrackSummary>> = HashMap::new();
    for t in target {
        by_title.entry(t.track.as_str()).or_default().push(t);
    }

    let mut report = JoinReport::default();
    for s in source {
        let Some(matches) = by_title.get(s.track.as_str()) else { continue };
        if matches.len() > 1 {
            logw!(
                "join ambiguity: {:?} matches {} {target_region} tracks by title",
                s.track,
                matches.len()
            );
            report.ambiguous_tracks += 1;
        }
        for t in matches {
            report.candidate_pairs += 1;
            if s.first_date >= t.first_date {
                report.not_earlier += 1;
                continue;
            }
            report.records.push(MergedRecord {
                track: s.track.clone(),
                artist: s.artist.clone(),
                source: RegionStats::from((source_region, s)),
                target: RegionStats::from((target_region, *t)),
            });
        }
    }

    if report.ambiguous_tracks > 0 {
        logw!(
            "{} {source_region} tracks matched several {target_region} tracks by title",
            report.ambiguous_tracks
        );
    }
    logf!(
        "join {source_region}→{target_region}: {} of {} title matches charted in {source_region} first",
        report.records.len(),
        report.candidate_pairs
    );
    report
}
