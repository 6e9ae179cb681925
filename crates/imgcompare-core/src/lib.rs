//! Core functionality for comparing images and mirrored image trees.
//!
//! This library provides the building blocks of a comparison run:
//! - Pair resolution across two files or two directory trees
//! - Five pixel-level metrics with diff visualizations
//! - A bounded-parallel job pipeline with deterministic result order
//! - Export of diffs, source copies and `meta.json`, plus querying them back

// -- External Dependencies --
use log::info;
use std::path::Path;

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::*;
pub use error::{Error, Result};
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod discovery;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod processing;
pub mod query;
pub mod types;

/// Main entry point for a comparison run
pub struct ImageComparer {
    config: Config,
}

impl ImageComparer {
    /// Create a new ImageComparer after validating the configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the comparison jobs for two files or two directories
    pub fn resolve(&self, source_a: &Path, source_b: &Path) -> Result<Vec<CompareJob>> {
        discovery::resolve_jobs(
            source_a,
            source_b,
            &self.config.comparisons,
            self.config.export_dir.as_deref(),
        )
    }

    /// Run the full comparison: resolve pairs, then execute every job
    pub fn run(&self, source_a: &Path, source_b: &Path) -> Result<Vec<Comparison>> {
        info!("Resolving image pairs...");
        let jobs = self.resolve(source_a, source_b)?;
        info!("Found {} pairs", jobs.len());

        if jobs.is_empty() {
            info!("Zero valid comparisons resolved");
            return Ok(Vec::new());
        }

        pipeline::run_jobs(
            &jobs,
            self.config.effective_threads(),
            self.config.show_progress,
        )
    }
}
