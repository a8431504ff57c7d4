// src/analysis/split.rs
use std::collections::HashSet;

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::data::{LabeledRow, TrackKey};
use crate::error::{ChartError, Result};

#[derive(Clone, Debug, Default)]
pub struct Split {
    pub train: Vec<LabeledRow>,
    pub test: Vec<LabeledRow>,
}

/// Hold out `fraction` of each label group (rounded to nearest) as the test set.
///
/// The draw is seeded, so the same rows, fraction and seed always give the same
/// partition. Train is everything whose track key was not drawn; both sides
/// keep input order.
pub fn stratified_split(rows: &[LabeledRow], fraction: f64, seed: u64) -> Result<Split> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(ChartError::Config(format!("holdout fraction must be in [0, 1], got {fraction}")));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut held_out: HashSet<TrackKey> = HashSet::new();

    for label in [false, true] {
        let mut group: Vec<&LabeledRow> = rows.iter().filter(|r| r.label == label).collect();
        let take = (group.len() as f64 * fraction).round() as usize;
        group.shuffle(&mut rng);
        held_out.extend(group.into_iter().take(take).map(|r| r.key()));
    }

    let (test, train): (Vec<LabeledRow>, Vec<LabeledRow>) =
        rows.iter().cloned().partition(|r| held_out.contains(&r.key()));

    logf!("split {} rows: {} train / {} test (seed {seed})", rows.len(), train.len(), test.len());
    Ok(Split { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(pos: usize, neg: usize) -> Vec<LabeledRow> {
        (0..pos + neg)
            .map(|i| LabeledRow {
                track: format!("t{i}"),
                artist: s!("a"),
                z_ranking: i as f64,
                z_time: -(i as f64),
                label: i < pos,
            })
            .collect()
    }

    #[test]
    fn partitions_are_disjoint_and_cover_input() {
        let input = rows(10, 40);
        let split = stratified_split(&input, 0.2, 7).unwrap();
        let train: HashSet<TrackKey> = split.train.iter().map(|r| r.key()).collect();
        let test: HashSet<TrackKey> = split.test.iter().map(|r| r.key()).collect();
        assert!(train.is_disjoint(&test));
        assert_eq!(train.len() + test.len(), input.len());
    }

    #[test]
    fn each_label_is_held_out_proportionally() {
        let split = stratified_split(&rows(10, 40), 0.2, 7).unwrap();
        assert_eq!(split.test.iter().filter(|r| r.label).count(), 2);
        assert_eq!(split.test.iter().filter(|r| !r.label).count(), 8);
    }

    #[test]
    fn same_seed_same_split() {
        let input = rows(15, 35);
        let a = stratified_split(&input, 0.3, 99).unwrap();
        let b = stratified_split(&input, 0.3, 99).unwrap();
        let keys = |v: &[LabeledRow]| v.iter().map(|r| r.key()).collect::<Vec<_>>();
        assert_eq!(keys(&a.test), keys(&b.test));
        assert_eq!(keys(&a.train), keys(&b.train));
    }

    #[test]
    fn out_of_range_fraction_is_rejected() {
        assert!(stratified_split(&rows(1, 1), 1.5, 0).is_err());
    }
}
