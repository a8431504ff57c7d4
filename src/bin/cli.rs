// src/bin/cli.rs
use chrono::NaiveDate;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use chart_scrape::{cli, log, progress::Progress};

/// Terminal progress bar over the days of one region sweep.
struct BarProgress {
    bar: Option<ProgressBar>,
}

impl Progress for BarProgress {
    fn begin(&mut self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template("{msg:>12} [{bar:40}] {pos}/{len} days ({eta})") {
            bar.set_style(style.progress_chars("=> "));
        }
        self.bar = Some(bar);
    }
    fn log(&mut self, msg: &str) {
        match &self.bar {
            Some(bar) => bar.println(msg),
            None => eprintln!("{msg}"),
        }
    }
    fn item_done(&mut self, day: NaiveDate, _rows: usize) {
        if let Some(bar) = &self.bar {
            bar.set_message(day.to_string());
            bar.inc(1);
        }
    }
    fn item_failed(&mut self, day: NaiveDate, _reason: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{day} ✗"));
            bar.inc(1);
        }
    }
    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = cli::Cli::parse();
    let opts = args.overrides.resolve()?;
    log::init(&opts.scrape.store_dir);

    let mut progress = BarProgress { bar: None };
    cli::execute(&args, &opts, &mut progress)?;
    Ok(())
}
