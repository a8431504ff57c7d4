// src/runner.rs
use std::path::PathBuf;

use crate::{
    analysis::{
        Classifier, Evaluation, JoinReport, Prediction, Split, artist_summaries, build_labeled,
        join_crossover, pair_predictions, stratified_split, track_summaries,
    },
    config::options::{AnalysisOptions, AppOptions, ExportOptions},
    core::PageSource,
    data::{ArtistSummary, LabeledRow, Region, TrackSummary},
    error::Result,
    file::{export_merged, export_table},
    progress::Progress,
    scrape::{IngestReport, Ingester},
};

/// Summaries for one region, derived wholesale from its Dataset.
#[derive(Clone, Debug)]
pub struct RegionSummary {
    pub ingest: IngestReport,
    pub artists: Vec<ArtistSummary>,
    pub tracks: Vec<TrackSummary>,
}

impl RegionSummary {
    pub fn region(&self) -> &Region {
        &self.ingest.dataset.region
    }
}

/// Everything the full pipeline produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub source: RegionSummary,
    pub target: RegionSummary,
    pub join: JoinReport,
    pub labeled: Vec<LabeledRow>,
    pub split: Split,
    pub predictions: Vec<Prediction>,
    pub evaluation: Evaluation,
}

/// Sweep one region over the configured date range.
pub fn ingest_region(
    opts: &AppOptions,
    pages: &dyn PageSource,
    region: &Region,
    progress: Option<&mut dyn Progress>,
) -> Result<IngestReport> {
    opts.scrape.validate()?;
    Ingester::from_options(pages, &opts.scrape).ingest(region, opts.scrape.start, opts.scrape.end, progress)
}

/// Ingest both regions, then aggregate → join → label → split → classify.
pub fn run<C: Classifier>(
    opts: &AppOptions,
    pages: &dyn PageSource,
    classifier: &C,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    opts.validate()?;
    let ingester = Ingester::from_options(pages, &opts.scrape);
    let (start, end) = (opts.scrape.start, opts.scrape.end);

    progress.log(&format!("Scraping {}…", opts.scrape.source_region));
    let source = ingester.ingest(&opts.scrape.source_region, start, end, Some(&mut *progress))?;
    progress.log(&format!("Scraping {}…", opts.scrape.target_region));
    let target = ingester.ingest(&opts.scrape.target_region, start, end, Some(&mut *progress))?;

    analyze(&opts.analysis, source, target, classifier)
}

/// The offline half of `run`: no network, no files.
pub fn analyze<C: Classifier>(
    opts: &AnalysisOptions,
    source: IngestReport,
    target: IngestReport,
    classifier: &C,
) -> Result<RunSummary> {
    let source = summarize(source);
    let target = summarize(target);

    let join = join_crossover(source.region(), &source.tracks, target.region(), &target.tracks);
    let labeled = build_labeled(&source.tracks, &target.ingest.dataset)?;
    let split = stratified_split(&labeled, opts.holdout_fraction, opts.seed)?;

    let model = classifier.train(&split.train)?;
    let predicted = classifier.predict(&model, &split.test);
    let predictions = pair_predictions(&split.test, &predicted);
    let evaluation = Evaluation::from_predictions(&predictions);
    if let Some(acc) = evaluation.accuracy() {
        logf!("test accuracy {:.3} over {} rows", acc, evaluation.total());
    }

    Ok(RunSummary { source, target, join, labeled, split, predictions, evaluation })
}

fn summarize(ingest: IngestReport) -> RegionSummary {
    let artists = artist_summaries(&ingest.dataset);
    let tracks = track_summaries(&ingest.dataset);
    RegionSummary { ingest, artists, tracks }
}

/// Write every table of a run under `export.out_dir`.
pub fn export_run(export: &ExportOptions, run: &RunSummary) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for side in [&run.source, &run.target] {
        let r = side.region().as_str();
        written.push(export_table(export, &join!(r, "_dataset"), &side.ingest.dataset.rows)?);
        written.push(export_table(export, &join!(r, "_artists"), &side.artists)?);
        written.push(export_table(export, &join!(r, "_tracks"), &side.tracks)?);
    }
    let (src, tgt) = (run.source.region(), run.target.region());
    written.push(export_merged(
        export,
        &join!(src.as_str(), "_", tgt.as_str(), "_merged"),
        src,
        tgt,
        &run.join.records,
    )?);
    written.push(export_table(export, "labeled", &run.labeled)?);
    written.push(export_table(export, "train", &run.split.train)?);
    written.push(export_table(export, "test", &run.split.test)?);
    written.push(export_table(export, "predictions", &run.predictions)?);
    logf!("wrote {} files to {}", written.len(), export.out_dir.display());
    Ok(written)
}

/// Human-readable report for the end of a run.
pub fn render_report(run: &RunSummary, top_artists: usize) -> String {
    let mut out = String::new();
    for side in [&run.source, &run.target] {
        let ing = &side.ingest;
        out.push_str(&format!(
            "[{}] {} rows over {} days; {} days without rows ({} fetch failures, {} missing tables); {} malformed rows\n",
            side.region(),
            ing.dataset.len(),
            ing.days_requested,
            ing.empty_days.len(),
            ing.fetch_failures,
            ing.missing_tables,
            ing.malformed_rows,
        ));
        out.push_str(&format!("  {} tracks, {} artists. Top artists by distinct songs:\n", side.tracks.len(), side.artists.len()));
        for a in side.artists.iter().take(top_artists) {
            out.push_str(&format!(
                "    {:<32} {:>4} songs {:>6} listings\n",
                a.artist, a.distinct_song_count, a.total_listing_count
            ));
        }
    }
    out.push_str(&format!(
        "Crossover {}→{}: {} records ({} title matches, {} ambiguous titles)\n",
        run.source.region(),
        run.target.region(),
        run.join.records.len(),
        run.join.candidate_pairs,
        run.join.ambiguous_tracks,
    ));
    let positives = run.labeled.iter().filter(|r| r.label).count();
    out.push_str(&format!(
        "Labeled {} tracks ({} positive); train {} / test {}\n",
        run.labeled.len(),
        positives,
        run.split.train.len(),
        run.split.test.len(),
    ));
    let e = &run.evaluation;
    match e.accuracy() {
        Some(acc) => out.push_str(&format!(
            "Accuracy {:.3}  (tp {} fp {} tn {} fn {})\n",
            acc, e.true_pos, e.false_pos, e.true_neg, e.false_neg
        )),
        None => out.push_str("Accuracy n/a (empty test set)\n"),
    }
    out
}
