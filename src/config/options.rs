// src/config/options.rs
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::data::{DATE_FMT, Region};
use crate::error::{ChartError, Result};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub analysis: AnalysisOptions,
    pub export: ExportOptions,
}

impl AppOptions {
    /// Read a TOML options file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| ChartError::Config(format!("{}: {e}", path.display())))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ChartError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.scrape.validate()?;
        self.analysis.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    pub source_region: Region,
    pub target_region: Region,
    /// Inclusive.
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
    /// `{region}` and `{date}` (YYYY-MM-DD) are substituted per request.
    pub url_template: String,
    pub workers: usize,
    pub request_pause_ms: u64,
    pub jitter_ms: u64,
    pub timeout_secs: u64,
    pub use_cache: bool,
    pub store_dir: PathBuf,
}

fn const_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FMT).expect("date constants are valid YYYY-MM-DD")
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            source_region: Region::new(SOURCE_REGION),
            target_region: Region::new(TARGET_REGION),
            start: const_date(START_DATE),
            end: const_date(END_DATE),
            url_template: s!(URL_TEMPLATE),
            workers: WORKERS,
            request_pause_ms: REQUEST_PAUSE_MS,
            jitter_ms: JITTER_MS,
            timeout_secs: TIMEOUT_SECS,
            use_cache: true,
            store_dir: PathBuf::from(STORE_DIR),
        }
    }
}

impl ScrapeOptions {
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(ChartError::Config(format!(
                "start {} is after end {}", self.start, self.end
            )));
        }
        if self.workers == 0 {
            return Err(ChartError::Config(s!("workers must be at least 1")));
        }
        for ph in ["{region}", "{date}"] {
            if !self.url_template.contains(ph) {
                return Err(ChartError::Config(format!("url_template is missing {ph}")));
            }
        }
        if self.source_region == self.target_region {
            return Err(ChartError::Config(format!(
                "source and target region are both {}", self.source_region
            )));
        }
        Ok(())
    }

    /// Every calendar day in the closed interval, ascending.
    pub fn days(&self) -> Vec<NaiveDate> {
        days_between(self.start, self.end)
    }
}

pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Share of each label group held out for testing.
    pub holdout_fraction: f64,
    pub seed: u64,
    pub top_artists: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            holdout_fraction: HOLDOUT_FRACTION,
            seed: SEED,
            top_artists: TOP_ARTISTS,
        }
    }
}

impl AnalysisOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.holdout_fraction > 0.0 && self.holdout_fraction < 1.0) {
            return Err(ChartError::Config(format!(
                "holdout_fraction must be in (0, 1), got {}", self.holdout_fraction
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> u8 {
        match self { ExportFormat::Csv => b',', ExportFormat::Tsv => b'\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub format: ExportFormat,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            format: ExportFormat::Csv,
            include_headers: true,
        }
    }
}

impl ExportOptions {
    /// `<out_dir>/<stem>.<ext>`
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.out_dir.join(join!(stem, ".", self.format.ext()))
    }
}
