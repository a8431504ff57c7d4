// src/scrape/mod.rs
mod ingest;

pub use ingest::{IngestReport, Ingester};
