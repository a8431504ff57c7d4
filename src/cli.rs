// src/cli.rs
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::analysis::NearestCentroid;
use crate::config::options::{AppOptions, ExportFormat};
use crate::core::HttpFetcher;
use crate::data::Region;
use crate::error::Result;
use crate::file::export_table;
use crate::progress::Progress;
use crate::runner;

#[derive(Debug, Parser)]
#[command(name = "chart_scrape", version, about = "Scrape daily charts for two regions and model crossover")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape one region over the date range and write its dataset
    Ingest {
        /// Region code; defaults to the configured source region
        #[arg(long)]
        region: Option<String>,
    },
    /// Scrape both regions, aggregate, join, label, split and classify
    Run,
    /// Print the effective configuration as TOML
    Config,
}

/// Command-line values that win over the options file.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// TOML options file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub source: Option<String>,
    #[arg(long, global = true)]
    pub target: Option<String>,
    /// Inclusive, YYYY-MM-DD
    #[arg(long, global = true)]
    pub start: Option<NaiveDate>,
    /// Inclusive, YYYY-MM-DD
    #[arg(long, global = true)]
    pub end: Option<NaiveDate>,
    /// Concurrent page fetches (1 = sequential)
    #[arg(long, global = true)]
    pub workers: Option<usize>,
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    /// Held-out share of each label group
    #[arg(long, global = true)]
    pub holdout: Option<f64>,
    /// Output directory
    #[arg(short, long, global = true)]
    pub out: Option<PathBuf>,
    #[arg(long, value_enum, global = true)]
    pub format: Option<ExportFormat>,
    /// Always refetch; don't read or write the day cache
    #[arg(long, global = true)]
    pub no_cache: bool,
}

impl Overrides {
    /// Options file (or defaults) with command-line values applied, validated.
    pub fn resolve(&self) -> Result<AppOptions> {
        let mut opts = match &self.config {
            Some(path) => AppOptions::load(path)?,
            None => AppOptions::default(),
        };
        let s = &mut opts.scrape;
        if let Some(v) = &self.source { s.source_region = Region::new(v); }
        if let Some(v) = &self.target { s.target_region = Region::new(v); }
        if let Some(v) = self.start { s.start = v; }
        if let Some(v) = self.end { s.end = v; }
        if let Some(v) = self.workers { s.workers = v; }
        if self.no_cache { s.use_cache = false; }
        if let Some(v) = self.seed { opts.analysis.seed = v; }
        if let Some(v) = self.holdout { opts.analysis.holdout_fraction = v; }
        if let Some(v) = &self.out { opts.export.out_dir = v.clone(); }
        if let Some(v) = self.format { opts.export.format = v; }
        opts.validate()?;
        Ok(opts)
    }
}

pub fn execute(cli: &Cli, opts: &AppOptions, progress: &mut dyn Progress) -> Result<()> {
    match &cli.command {
        Command::Config => {
            print!("{}", opts.to_toml()?);
        }
        Command::Ingest { region } => {
            let region = region
                .as_deref()
                .map(Region::new)
                .unwrap_or_else(|| opts.scrape.source_region.clone());
            let fetcher = HttpFetcher::new(&opts.scrape)?;
            let report = runner::ingest_region(opts, &fetcher, &region, Some(progress))?;
            let path = export_table(&opts.export, &join!(region.as_str(), "_dataset"), &report.dataset.rows)?;
            println!(
                "{}: {} rows, {} of {} days empty → {}",
                region,
                report.dataset.len(),
                report.empty_days.len(),
                report.days_requested,
                path.display()
            );
        }
        Command::Run => {
            let fetcher = HttpFetcher::new(&opts.scrape)?;
            let summary = runner::run(opts, &fetcher, &NearestCentroid, progress)?;
            let written = runner::export_run(&opts.export, &summary)?;
            print!("{}", runner::render_report(&summary, opts.analysis.top_artists));
            println!("Wrote {} files to {}", written.len(), opts.export.out_dir.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "chart_scrape", "run", "--source", "SE", "--start", "2018-02-01", "--end", "2018-02-10",
            "--workers", "2", "--seed", "5", "--format", "tsv", "--no-cache",
        ]);
        let opts = cli.overrides.resolve().unwrap();
        assert_eq!(opts.scrape.source_region.as_str(), "se");
        assert_eq!(opts.scrape.days().len(), 10);
        assert_eq!(opts.scrape.workers, 2);
        assert!(!opts.scrape.use_cache);
        assert_eq!(opts.analysis.seed, 5);
        assert_eq!(opts.export.format, ExportFormat::Tsv);
        assert!(matches!(cli.command, Command::Run));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let cli = Cli::parse_from(["chart_scrape", "config", "--source", "gb", "--target", "gb"]);
        assert!(cli.overrides.resolve().is_err());
    }

    #[test]
    fn ingest_takes_optional_region() {
        let cli = Cli::parse_from(["chart_scrape", "ingest", "--region", "de"]);
        assert!(matches!(cli.command, Command::Ingest { region: Some(ref r) } if r == "de"));
    }
}
