use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::export::META_FILE_NAME;

/// Pixel-level comparison metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonKind {
    /// Exact per-pixel color equality
    Pixel,

    /// Per-pixel luminance difference against a threshold
    Contrast,

    /// Average luminance of 2x2 blocks against a threshold
    Quad,

    /// Global structural similarity
    Ssim,

    /// Mean squared error over RGB
    Mse,
}

impl ComparisonKind {
    /// Every metric, in canonical order
    pub const ALL: [ComparisonKind; 5] = [
        ComparisonKind::Pixel,
        ComparisonKind::Contrast,
        ComparisonKind::Quad,
        ComparisonKind::Ssim,
        ComparisonKind::Mse,
    ];

    /// Lowercase name used on the command line, in file names and in meta.json
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pixel => "pixel",
            Self::Contrast => "contrast",
            Self::Quad => "quad",
            Self::Ssim => "ssim",
            Self::Mse => "mse",
        }
    }

    /// Whether the metric reports a discrete failure count
    pub fn counts_failures(&self) -> bool {
        matches!(self, Self::Pixel | Self::Contrast | Self::Quad)
    }

    /// Parse a comma separated selection such as `pixel,quad` or `all`.
    ///
    /// Order is preserved and repeated names collapse to their first occurrence.
    pub fn parse_list(selection: &str) -> Result<Vec<ComparisonKind>> {
        let selection = selection.trim();
        if selection.eq_ignore_ascii_case("all") {
            return Ok(Self::ALL.to_vec());
        }

        let mut kinds = Vec::new();
        for name in selection.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let kind: ComparisonKind = name.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }

        if kinds.is_empty() {
            return Err(Error::Configuration("No comparison type set".to_string()));
        }

        Ok(kinds)
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownComparison(s.to_string()))
    }
}

/// Image formats recognized when pairing directory trees
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    WebP,
    Other(String),
}

impl ImageFormat {
    /// Determine format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            "webp" => Self::WebP,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if format can be decoded
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// One unit of work produced by the pair resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareJob {
    /// Image from the first tree
    pub source_a: PathBuf,

    /// Image from the second tree
    pub source_b: PathBuf,

    /// Metrics to compute, in output order
    pub comparisons: Vec<ComparisonKind>,

    /// Where to write diff images and meta.json, if anywhere
    pub export_destination: Option<PathBuf>,
}

impl CompareJob {
    pub fn new(
        source_a: impl Into<PathBuf>,
        source_b: impl Into<PathBuf>,
        comparisons: Vec<ComparisonKind>,
        export_destination: Option<PathBuf>,
    ) -> Self {
        Self {
            source_a: source_a.into(),
            source_b: source_b.into(),
            comparisons,
            export_destination,
        }
    }

    /// Basenames of both sources, suffixed with `_A`/`_B` when they collide
    /// with each other or with a file the export writes (`<metric>.png`,
    /// `meta.json`)
    pub fn source_names(&self) -> (String, String) {
        disambiguate_names(&self.source_a, &self.source_b)
    }
}

/// Output of a single metric for a single job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Which metric produced this result
    #[serde(rename = "comparison")]
    pub kind: ComparisonKind,

    /// Normalized similarity, 1.0 means identical
    pub index: f64,

    /// Non-matching pixels, or -1 when the metric has no failure count
    #[serde(rename = "numfailed")]
    pub num_failed: i64,
}

/// Aggregate result of one job, serialized as meta.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Export directory, empty when nothing was exported
    pub location: String,

    pub source_a: String,

    pub source_b: String,

    /// Metric results in requested order
    pub results: Vec<MetricResult>,
}

impl Comparison {
    /// Look up the result of a given metric
    pub fn result(&self, kind: ComparisonKind) -> Option<&MetricResult> {
        self.results.iter().find(|r| r.kind == kind)
    }
}

fn disambiguate_names(a: &Path, b: &Path) -> (String, String) {
    let name_a = file_name_string(a);
    let name_b = file_name_string(b);

    if name_a != name_b && !is_export_artifact(&name_a) && !is_export_artifact(&name_b) {
        return (name_a, name_b);
    }

    (suffixed_name(a, "_A"), suffixed_name(b, "_B"))
}

/// Names written by the export next to the source copies. Compared without
/// case so case-insensitive file systems are covered too.
fn is_export_artifact(name: &str) -> bool {
    name.eq_ignore_ascii_case(META_FILE_NAME)
        || ComparisonKind::ALL
            .iter()
            .any(|kind| name.eq_ignore_ascii_case(&format!("{}.png", kind)))
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn suffixed_name(path: &Path, suffix: &str) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    }
}
