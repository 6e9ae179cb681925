//! Querying exported results.
//!
//! Every export directory holds a `meta.json` with one [`Comparison`]. These
//! helpers collect them back from disk and select the ones that look like
//! regressions.

use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::export::META_FILE_NAME;
use crate::types::{Comparison, ComparisonKind};

/// Read every `meta.json` below the given directories, in walk order
pub fn find_meta_files<P: AsRef<Path>>(directories: &[P]) -> Result<Vec<Comparison>> {
    let mut comparisons = Vec::new();

    for dir in directories {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Err(Error::FileNotFound(dir.to_path_buf()));
        }

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() || entry.file_name() != META_FILE_NAME {
                continue;
            }

            debug!("Reading {}", entry.path().display());
            let reader = BufReader::new(File::open(entry.path())?);
            comparisons.push(serde_json::from_reader(reader)?);
        }
    }

    Ok(comparisons)
}

/// Thresholds a comparison must meet to be reported
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    /// Metrics to look at
    pub comparisons: Vec<ComparisonKind>,

    /// Results with an index above this pass as "similar enough"
    pub max_index: f64,

    /// When non-zero, only failure counts up to this value are reported and
    /// metrics without a failure count never are
    pub max_failed: i64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            comparisons: ComparisonKind::ALL.to_vec(),
            max_index: 1.0,
            max_failed: 0,
        }
    }
}

impl FilterCriteria {
    /// True when at least one result of `comparison` meets every threshold
    pub fn matches(&self, comparison: &Comparison) -> bool {
        comparison.results.iter().any(|result| {
            if !self.comparisons.contains(&result.kind) {
                return false;
            }

            if result.index > self.max_index {
                return false;
            }

            if self.max_failed != 0
                && (result.num_failed == -1 || result.num_failed > self.max_failed)
            {
                return false;
            }

            true
        })
    }
}

/// Keep the comparisons accepted by `criteria`, preserving order
pub fn filter_comparisons<'a>(
    comparisons: &'a [Comparison],
    criteria: &FilterCriteria,
) -> Vec<&'a Comparison> {
    comparisons.iter().filter(|c| criteria.matches(c)).collect()
}
