//! Bounded-parallel execution of comparison jobs.
//!
//! Jobs run on a dedicated rayon pool sized to the requested worker count.
//! Results are collected through an indexed parallel iterator, so slot `i`
//! of the output always belongs to job `i` whatever order jobs finish in.
//! The first load or export failure stops the run and is returned; metric
//! errors only drop that metric from the job's result list.

use image::RgbaImage;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::export::export_comparison;
use crate::logging::{log_file_error, log_metric_error};
use crate::processing::{load_image, run_metric};
use crate::types::{CompareJob, Comparison, ComparisonKind};

/// Execute `jobs` with at most `threads` in flight and return one
/// [`Comparison`] per job, in input order.
pub fn run_jobs(jobs: &[CompareJob], threads: usize, show_progress: bool) -> Result<Vec<Comparison>> {
    if threads == 0 {
        return Err(Error::Configuration(
            "Worker count must be at least 1".to_string(),
        ));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("compare-worker-{}", i))
        .build()
        .map_err(|e| Error::Configuration(format!("Failed to build thread pool: {}", e)))?;

    info!("Running {} comparisons on {} workers", jobs.len(), threads);

    let progress = progress_bar(jobs.len(), show_progress);
    let start = Instant::now();

    let results: Result<Vec<Comparison>> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let result = run_job(job);
                progress.inc(1);
                result
            })
            .collect()
    });

    match &results {
        Ok(comparisons) => {
            progress.finish_with_message("done");
            info!(
                "Completed {} comparisons in {:.2?}",
                comparisons.len(),
                start.elapsed()
            );
        }
        Err(e) => {
            progress.abandon_with_message("failed");
            info!("Comparison run aborted after {:.2?}: {}", start.elapsed(), e);
        }
    }

    results
}

/// Load both images of a job, run its metrics and export when requested
pub fn run_job(job: &CompareJob) -> Result<Comparison> {
    debug!(
        "Comparing '{}' with '{}'",
        job.source_a.display(),
        job.source_b.display()
    );

    let image_a = load_image(&job.source_a).map_err(|e| {
        log_file_error(&job.source_a, "load", &e);
        e
    })?;
    let image_b = load_image(&job.source_b).map_err(|e| {
        log_file_error(&job.source_b, "load", &e);
        e
    })?;

    let keep_diffs = job.export_destination.is_some();
    let mut results = Vec::with_capacity(job.comparisons.len());
    let mut diffs: Vec<(ComparisonKind, RgbaImage)> = Vec::new();

    for &kind in &job.comparisons {
        match run_metric(kind, &image_a, &image_b) {
            Ok(output) => {
                let (result, diff) = output.into_result(kind);
                debug!(
                    "{} comparison: {:.6} ({} failed)",
                    kind, result.index, result.num_failed
                );
                results.push(result);
                if keep_diffs {
                    diffs.push((kind, diff));
                }
            }
            Err(e) if e.is_metric_error() => log_metric_error(kind, &job.source_a, &e),
            Err(e) => return Err(e),
        }
    }

    let (source_a, source_b) = job.source_names();
    let comparison = Comparison {
        location: job
            .export_destination
            .as_ref()
            .map(|dest| dest.display().to_string())
            .unwrap_or_default(),
        source_a,
        source_b,
        results,
    };

    if let Some(destination) = &job.export_destination {
        export_comparison(destination, job, &comparison, &diffs).map_err(|e| {
            log_file_error(destination, "export", &e);
            e
        })?;
    }

    Ok(comparison)
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    let progress = if visible {
        ProgressBar::new(total as u64)
    } else {
        ProgressBar::hidden()
    };

    if let Ok(style) =
        ProgressStyle::default_bar().template("[{eta}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
    {
        progress.set_style(style.progress_chars("##-"));
    }
    progress.set_message("Comparing images...");
    progress
}
