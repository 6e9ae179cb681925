//! # Metric Kernels
//!
//! Five pure functions comparing two equally sized images. Every kernel
//! returns a normalized similarity index (1.0 = identical), a failure count
//! and a same-sized diff visualization.
//!
//! | Kind     | Index                                   | Failure count          |
//! |----------|-----------------------------------------|------------------------|
//! | pixel    | fraction of exactly equal pixels        | mismatching pixels     |
//! | contrast | fraction of pixels within 0.25 luma     | pixels over threshold  |
//! | quad     | fraction of pixels in matching 2x2 blocks | 4 per failing block  |
//! | ssim     | global structural similarity            | -1                     |
//! | mse      | 1 - mean squared RGB error              | -1                     |
//!
//! Images are handled as 16-bit RGBA so that 8 and 16 bit sources compare on
//! the same scale.

mod contrast;
mod luminance;
mod mse;
mod pixel;
mod quad;
mod ssim;

pub use contrast::{contrast_compare, CONTRAST_THRESHOLD};
pub use luminance::{gray_value, luma8, Rgba16Image};
pub use mse::mse_compare;
pub use pixel::pixel_compare;
pub use quad::{quad_compare, QUAD_THRESHOLD};
pub use ssim::{ssim_compare, SSIM_C1, SSIM_C2};

use image::{DynamicImage, RgbaImage};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{ComparisonKind, MetricResult};

/// Raw output of one kernel invocation
#[derive(Debug, Clone)]
pub struct MetricOutput {
    /// Normalized similarity, 1.0 means identical
    pub index: f64,

    /// Failure count, -1 when the metric has none
    pub num_failed: i64,

    /// Visualization of where the images differ
    pub diff: RgbaImage,
}

impl MetricOutput {
    /// Split into the serializable result and the diff image
    pub fn into_result(self, kind: ComparisonKind) -> (MetricResult, RgbaImage) {
        (
            MetricResult {
                kind,
                index: self.index,
                num_failed: self.num_failed,
            },
            self.diff,
        )
    }
}

/// Decode an image file into the 16-bit RGBA buffer every kernel works on
pub fn load_image(path: &Path) -> Result<Rgba16Image> {
    let img: DynamicImage = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba16())
}

/// Run the kernel for `kind` on two images.
///
/// Fails with [`Error::DimensionMismatch`] when the images differ in size and
/// with [`Error::Dimension`] when quad sees an odd width or height.
pub fn run_metric(kind: ComparisonKind, a: &Rgba16Image, b: &Rgba16Image) -> Result<MetricOutput> {
    if a.dimensions() != b.dimensions() {
        return Err(Error::DimensionMismatch {
            a: a.dimensions(),
            b: b.dimensions(),
        });
    }

    let output = match kind {
        ComparisonKind::Pixel => pixel_compare(a, b),
        ComparisonKind::Contrast => contrast_compare(a, b),
        ComparisonKind::Quad => quad_compare(a, b)?,
        ComparisonKind::Ssim => ssim_compare(a, b),
        ComparisonKind::Mse => mse_compare(a, b),
    };

    Ok(output)
}
