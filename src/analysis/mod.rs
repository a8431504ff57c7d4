// src/analysis/mod.rs
//
// Everything downstream of ingestion. All of it is recomputed wholesale from
// the region Datasets on each run; nothing here is incremental.

pub mod aggregate;
pub mod classify;
pub mod features;
pub mod join;
pub mod split;

pub use aggregate::{artist_summaries, track_summaries};
pub use classify::{Classifier, Evaluation, NearestCentroid, Prediction, pair_predictions};
pub use features::build_labeled;
pub use join::{JoinReport, join_crossover};
pub use split::{Split, stratified_split};
