// src/scrape/ingest.rs
use std::{
    sync::{atomic::{AtomicUsize, Ordering}, mpsc},
    thread,
    time::Duration,
};

use chrono::NaiveDate;
use rand::Rng;

use crate::{
    config::options::{ScrapeOptions, days_between},
    core::PageSource,
    data::{Dataset, Region},
    error::{ChartError, Result},
    progress::Progress,
    specs::chart::{self, Extraction},
    store::DayCache,
};

/// What one region's sweep produced, including an account of the gaps.
#[derive(Clone, Debug)]
pub struct IngestReport {
    /// Rows in (day, rank) order.
    pub dataset: Dataset,
    pub days_requested: usize,
    /// Days that contributed zero rows, for any reason, ascending.
    pub empty_days: Vec<NaiveDate>,
    pub fetch_failures: usize,
    pub missing_tables: usize,
    pub malformed_rows: usize,
    pub skipped_rows: usize,
    pub cached_days: usize,
}

enum Gap {
    Fetch,
    MissingTable,
}

enum DayOutcome {
    Rows { extraction: Extraction, cached: bool },
    Gap { kind: Gap, reason: String },
}

/// Drives fetch + extract over every day of a closed date range for one region.
///
/// Days are pulled by a small pool of worker threads (`workers == 1` is a plain
/// sequential sweep) and reassembled in day order, so the output never depends
/// on which worker finished first. Per-day failures become empty days; they
/// never abort the sweep.
pub struct Ingester<'a> {
    source: &'a dyn PageSource,
    cache: Option<DayCache>,
    workers: usize,
    pause_ms: u64,
    jitter_ms: u64,
}

impl<'a> Ingester<'a> {
    /// Sequential, uncached, no pause between requests.
    pub fn new(source: &'a dyn PageSource) -> Self {
        Self { source, cache: None, workers: 1, pause_ms: 0, jitter_ms: 0 }
    }

    pub fn from_options(source: &'a dyn PageSource, opts: &ScrapeOptions) -> Self {
        Self {
            source,
            cache: opts.use_cache.then(|| DayCache::new(&opts.store_dir)),
            workers: opts.workers.max(1),
            pause_ms: opts.request_pause_ms,
            jitter_ms: opts.jitter_ms,
        }
    }

    pub fn with_cache(mut self, cache: DayCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn ingest(
        &self,
        region: &Region,
        start: NaiveDate,
        end: NaiveDate,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<IngestReport> {
        if start > end {
            return Err(ChartError::Config(format!("start {start} is after end {end}")));
        }
        let days = days_between(start, end);
        logf!("Ingesting {region}: {} days ({start} .. {end})", days.len());

        if let Some(p) = progress.as_deref_mut() {
            p.begin(days.len());
        }

        let mut outcomes: Vec<Option<DayOutcome>> = (0..days.len()).map(|_| None).collect();
        let counter = AtomicUsize::new(0);
        let (res_tx, res_rx) = mpsc::channel::<(usize, DayOutcome)>();
        let workers = self.workers.min(days.len()).max(1);

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = res_tx.clone();
                let (days, counter) = (&days, &counter);
                scope.spawn(move || {
                    loop {
                        let i = counter.fetch_add(1, Ordering::Relaxed);
                        if i >= days.len() {
                            break;
                        }
                        let outcome = self.run_day(region, days[i]);
                        let hit_network = !matches!(outcome, DayOutcome::Rows { cached: true, .. });
                        if tx.send((i, outcome)).is_err() {
                            break;
                        }
                        if hit_network && self.pause_ms > 0 {
                            thread::sleep(self.pause()); // be polite
                        }
                    }
                });
            }
            drop(res_tx); // this thread is the sole receiver now

            for (i, outcome) in res_rx {
                if let Some(p) = progress.as_deref_mut() {
                    match &outcome {
                        DayOutcome::Rows { extraction, .. } => p.item_done(days[i], extraction.rows.len()),
                        DayOutcome::Gap { reason, .. } => p.item_failed(days[i], reason),
                    }
                }
                outcomes[i] = Some(outcome);
            }
        });

        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }

        let report = assemble(region, &days, outcomes);
        logf!(
            "{region}: {} rows over {} days; {} empty ({} fetch failures, {} missing tables), {} cached, {} malformed, {} skipped",
            report.dataset.len(),
            report.days_requested,
            report.empty_days.len(),
            report.fetch_failures,
            report.missing_tables,
            report.cached_days,
            report.malformed_rows,
            report.skipped_rows,
        );
        Ok(report)
    }

    /// `pause_ms` plus a random `0..jitter_ms`.
    fn pause(&self) -> Duration {
        let jitter = if self.jitter_ms > 0 { rand::thread_rng().gen_range(0..self.jitter_ms) } else { 0 };
        Duration::from_millis(self.pause_ms + jitter)
    }

    fn run_day(&self, region: &Region, day: NaiveDate) -> DayOutcome {
        if let Some(cache) = &self.cache {
            match cache.load(region, day) {
                Ok(Some(extraction)) => {
                    logd!("{region} {day}: {} rows from cache", extraction.rows.len());
                    return DayOutcome::Rows { extraction, cached: true };
                }
                Ok(None) => {}
                Err(e) => logw!("{region} {day}: ignoring unreadable cache entry: {e}"),
            }
        }

        let doc = match self.source.fetch(region, day) {
            Ok(doc) => doc,
            Err(e) => {
                logw!("{e}");
                return DayOutcome::Gap { kind: Gap::Fetch, reason: e.to_string() };
            }
        };

        match chart::extract(&doc, region, day) {
            Ok(extraction) => {
                logd!("{region} {day}: {} rows extracted", extraction.rows.len());
                if let (Some(cache), false) = (&self.cache, extraction.rows.is_empty()) {
                    if let Err(e) = cache.save(region, day, &extraction) {
                        logw!("{region} {day}: could not cache rows: {e}");
                    }
                }
                DayOutcome::Rows { extraction, cached: false }
            }
            Err(e) => {
                if e.is_day_gap() {
                    logw!("{e}");
                } else {
                    loge!("{region} {day}: {e}");
                }
                let kind = match e {
                    ChartError::MissingTable { .. } => Gap::MissingTable,
                    _ => Gap::Fetch,
                };
                DayOutcome::Gap { kind, reason: e.to_string() }
            }
        }
    }
}

/// Fold per-day outcomes into one Dataset, in day order.
fn assemble(region: &Region, days: &[NaiveDate], outcomes: Vec<Option<DayOutcome>>) -> IngestReport {
    let mut report = IngestReport {
        dataset: Dataset::new(region.clone()),
        days_requested: days.len(),
        empty_days: Vec::new(),
        fetch_failures: 0,
        missing_tables: 0,
        malformed_rows: 0,
        skipped_rows: 0,
        cached_days: 0,
    };

    for (day, outcome) in days.iter().copied().zip(outcomes) {
        match outcome {
            Some(DayOutcome::Rows { extraction, cached }) => {
                if cached { report.cached_days += 1; }
                report.malformed_rows += extraction.malformed;
                report.skipped_rows += extraction.skipped;
                if extraction.rows.is_empty() {
                    report.empty_days.push(day);
                }
                report.dataset.rows.extend(extraction.rows);
            }
            Some(DayOutcome::Gap { kind, .. }) => {
                match kind {
                    Gap::Fetch => report.fetch_failures += 1,
                    Gap::MissingTable => report.missing_tables += 1,
                }
                report.empty_days.push(day);
            }
            None => {
                // worker ended without reporting this day
                report.fetch_failures += 1;
                report.empty_days.push(day);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Pages(HashMap<NaiveDate, String>);

    impl PageSource for Pages {
        fn fetch(&self, region: &Region, day: NaiveDate) -> Result<String> {
            self.0.get(&day).cloned().ok_or_else(|| ChartError::Fetch {
                region: region.clone(),
                day,
                reason: s!("HTTP 404"),
            })
        }
    }

    fn d(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, n).unwrap()
    }

    fn page(rows: &[(u32, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(r, t)| format!("<tr><td>{r}</td><td>{t}<br>by Artist</td><td>100</td></tr>"))
            .collect();
        format!(r#"<table class="chart-table"><tbody>{body}</tbody></table>"#)
    }

    #[test]
    fn fetch_failure_becomes_empty_day() {
        let pages = Pages(HashMap::from([(d(1), page(&[(1, "a")])), (d(3), page(&[(1, "b")]))]));
        let report = Ingester::new(&pages).ingest(&Region::new("us"), d(1), d(3), None).unwrap();
        assert_eq!(report.dataset.len(), 2);
        assert_eq!(report.empty_days, vec![d(2)]);
        assert_eq!(report.fetch_failures, 1);
        assert_eq!(report.missing_tables, 0);
    }

    #[test]
    fn pool_output_matches_sequential_order() {
        let pages = Pages(
            (1..=9)
                .map(|n| (d(n), page(&[(2, "second"), (1, "first"), (3, "third")])))
                .collect(),
        );
        let region = Region::new("us");
        let seq = Ingester::new(&pages).ingest(&region, d(1), d(9), None).unwrap();
        let par = Ingester::new(&pages).with_workers(4).ingest(&region, d(1), d(9), None).unwrap();
        assert_eq!(seq.dataset, par.dataset);
        assert!(par.dataset.is_ordered());
        assert_eq!(par.dataset.len(), 27);
    }

    #[test]
    fn pause_stays_within_jitter_bound() {
        let pages = Pages(HashMap::new());
        let opts = ScrapeOptions { request_pause_ms: 20, jitter_ms: 10, ..Default::default() };
        let ingester = Ingester::from_options(&pages, &opts);
        for _ in 0..200 {
            let p = ingester.pause();
            assert!(p >= Duration::from_millis(20) && p < Duration::from_millis(30));
        }
        assert_eq!(Ingester::new(&pages).pause(), Duration::ZERO);
    }

    #[test]
    fn reversed_range_is_a_config_error() {
        let pages = Pages(HashMap::new());
        let err = Ingester::new(&pages).ingest(&Region::new("us"), d(2), d(1), None).unwrap_err();
        assert!(matches!(err, ChartError::Config(_)));
    }
}
