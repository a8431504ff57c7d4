//! # Page specs
//!
//! Page-specific extraction: *where the ground truth lives in the HTML* and how
//! to pull it out robustly. Specs are pure functions of the fetched markup; they
//! never fetch, cache or export.
//!
//! ## Typical call chain
//! ```text
//! runner → scrape::ingest → core::net (fetch) → specs::chart::extract
//!                        ↘ store (day cache, outside of specs)
//! ```
//!
//! ## Conventions
//! - Select by class marker, not by position in the document.
//! - Return rows in a stable shape (`ChartRow`) and account for every data row
//!   that could not be used (`Extraction::malformed`, `Extraction::skipped`).
//! - Specs are testable offline against inline or captured fixtures.
pub mod chart;
