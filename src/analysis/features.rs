// src/analysis/features.rs
use std::collections::HashSet;

use crate::data::{Dataset, LabeledRow, TrackKey, TrackSummary};
use crate::error::{ChartError, Result};

/// Sample mean and standard deviation (n - 1 denominator) of one feature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moments {
    pub mean: f64,
    pub std_dev: f64,
}

impl Moments {
    pub fn of(feature: &'static str, values: &[f64]) -> Result<Self> {
        let n = values.len();
        if n < 2 {
            return Err(ChartError::DegenerateInput {
                feature,
                reason: format!("need at least 2 values for a sample deviation, got {n}"),
            });
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std_dev = var.sqrt();
        if std_dev == 0.0 || !std_dev.is_finite() {
            return Err(ChartError::DegenerateInput {
                feature,
                reason: format!("all {n} values equal {mean}"),
            });
        }
        Ok(Self { mean, std_dev })
    }

    pub fn z(&self, v: f64) -> f64 {
        (v - self.mean) / self.std_dev
    }
}

/// Standardize `highest_ranking` and `time_up` over the whole source set and
/// label each track by whether it shows up anywhere in the target Dataset
/// (same title and artist).
pub fn build_labeled(source: &[TrackSummary], target: &Dataset) -> Result<Vec<LabeledRow>> {
    let ranking: Vec<f64> = source.iter().map(|t| t.highest_ranking as f64).collect();
    let time: Vec<f64> = source.iter().map(|t| t.time_up as f64).collect();
    let rank_m = Moments::of("highest_ranking", &ranking)?;
    let time_m = Moments::of("time_up", &time)?;
    logd!("highest_ranking {rank_m:?}, time_up {time_m:?}");

    let seen: HashSet<TrackKey> = target.rows.iter().map(|r| r.key()).collect();

    let rows: Vec<LabeledRow> = source
        .iter()
        .map(|t| LabeledRow {
            track: t.track.clone(),
            artist: t.artist.clone(),
            z_ranking: rank_m.z(t.highest_ranking as f64),
            z_time: time_m.z(t.time_up as f64),
            label: seen.contains(&t.key()),
        })
        .collect();

    let positives = rows.iter().filter(|r| r.label).count();
    logf!("labeled {} tracks: {positives} also charted in {}", rows.len(), target.region);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ChartRow, Region};
    use chrono::NaiveDate;

    fn d(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, n).unwrap()
    }

    fn summary(track: &str, best: u32, time_up: i64) -> TrackSummary {
        TrackSummary {
            track: s!(track),
            artist: s!("A"),
            highest_ranking: best,
            time_up,
            first_date: d(1),
            last_date: d(1),
        }
    }

    fn mean_and_sample_std(v: &[f64]) -> (f64, f64) {
        let n = v.len() as f64;
        let m = v.iter().sum::<f64>() / n;
        let s = (v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
        (m, s)
    }

    #[test]
    fn z_scores_have_zero_mean_unit_std() {
        let src = vec![summary("a", 1, 30), summary("b", 50, 2), summary("c", 12, 9), summary("d", 200, 1)];
        let target = Dataset {
            region: Region::new("gb"),
            rows: vec![ChartRow { rank: 4, track: s!("c"), artist: s!("A"), streams: 1, day: d(2) }],
        };
        let rows = build_labeled(&src, &target).unwrap();
        for col in [
            rows.iter().map(|r| r.z_ranking).collect::<Vec<_>>(),
            rows.iter().map(|r| r.z_time).collect::<Vec<_>>(),
        ] {
            let (m, s) = mean_and_sample_std(&col);
            assert!(m.abs() < 1e-9, "mean {m}");
            assert!((s - 1.0).abs() < 1e-9, "std {s}");
        }
        let labels: Vec<bool> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![false, false, true, false]);
    }

    #[test]
    fn constant_feature_is_degenerate() {
        let src = vec![summary("a", 1, 3), summary("b", 1, 5)];
        let target = Dataset::new(Region::new("gb"));
        let err = build_labeled(&src, &target).unwrap_err();
        assert!(matches!(err, ChartError::DegenerateInput { feature: "highest_ranking", .. }));
    }

    #[test]
    fn single_row_is_degenerate() {
        let err = build_labeled(&[summary("a", 1, 3)], &Dataset::new(Region::new("gb"))).unwrap_err();
        assert!(matches!(err, ChartError::DegenerateInput { .. }));
    }
}
