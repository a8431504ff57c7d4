// src/analysis/classify.rs
//
// Narrow boundary to whatever model predicts crossover. The pipeline only
// needs train(rows) -> model and predict(model, rows) -> labels; the
// `NearestCentroid` baseline keeps the run self-contained.

use crate::data::{LabeledRow, Tabular};
use crate::error::{ChartError, Result};

pub trait Classifier {
    type Model;

    /// Fit on rows whose `label` is known.
    fn train(&self, rows: &[LabeledRow]) -> Result<Self::Model>;

    /// One predicted label per input row, same order. Input labels are ignored.
    fn predict(&self, model: &Self::Model, rows: &[LabeledRow]) -> Vec<bool>;
}

/// Assigns each row to the label whose training centroid in
/// (z_ranking, z_time) space is closer. Ties go to `false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestCentroid;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroids {
    pub positive: Option<[f64; 2]>,
    pub negative: Option<[f64; 2]>,
}

fn centroid<'a>(rows: impl Iterator<Item = &'a LabeledRow>) -> Option<[f64; 2]> {
    let (mut sum, mut n) = ([0.0, 0.0], 0usize);
    for r in rows {
        let f = r.features();
        sum[0] += f[0];
        sum[1] += f[1];
        n += 1;
    }
    (n > 0).then(|| [sum[0] / n as f64, sum[1] / n as f64])
}

fn dist2(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

impl Classifier for NearestCentroid {
    type Model = Centroids;

    fn train(&self, rows: &[LabeledRow]) -> Result<Centroids> {
        if rows.is_empty() {
            return Err(ChartError::DegenerateInput {
                feature: "label",
                reason: s!("no training rows"),
            });
        }
        let model = Centroids {
            positive: centroid(rows.iter().filter(|r| r.label)),
            negative: centroid(rows.iter().filter(|r| !r.label)),
        };
        logd!("trained {model:?} on {} rows", rows.len());
        Ok(model)
    }

    fn predict(&self, model: &Centroids, rows: &[LabeledRow]) -> Vec<bool> {
        rows.iter()
            .map(|r| match (model.positive, model.negative) {
                (Some(p), Some(n)) => dist2(r.features(), p) < dist2(r.features(), n),
                (Some(_), None) => true,
                _ => false,
            })
            .collect()
    }
}

/// Test row next to what the model said about it.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub track: String,
    pub artist: String,
    pub label: bool,
    pub predicted: bool,
}

impl Tabular for Prediction {
    const HEADERS: &'static [&'static str] = &["Track", "Artist", "Label", "Predicted"];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.track.clone(),
            self.artist.clone(),
            self.label.to_string(),
            self.predicted.to_string(),
        ]
    }
}

pub fn pair_predictions(rows: &[LabeledRow], predicted: &[bool]) -> Vec<Prediction> {
    rows.iter()
        .zip(predicted)
        .map(|(r, p)| Prediction {
            track: r.track.clone(),
            artist: r.artist.clone(),
            label: r.label,
            predicted: *p,
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub true_pos: usize,
    pub false_pos: usize,
    pub true_neg: usize,
    pub false_neg: usize,
}

impl Evaluation {
    pub fn from_predictions(preds: &[Prediction]) -> Self {
        let mut e = Self::default();
        for p in preds {
            match (p.label, p.predicted) {
                (true, true) => e.true_pos += 1,
                (false, true) => e.false_pos += 1,
                (false, false) => e.true_neg += 1,
                (true, false) => e.false_neg += 1,
            }
        }
        e
    }

    pub fn total(&self) -> usize {
        self.true_pos + self.false_pos + self.true_neg + self.false_neg
    }

    /// `None` on an empty test set.
    pub fn accuracy(&self) -> Option<f64> {
        let n = self.total();
        (n > 0).then(|| (self.true_pos + self.true_neg) as f64 / n as f64)
    }
}
