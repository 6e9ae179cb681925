use image::RgbaImage;

use super::luminance::{fraction, Rgba16Image, BLACK, WHITE};
use super::MetricOutput;

/// Exact per-pixel comparison, alpha included.
///
/// Mismatching pixels are white in the diff, everything else black.
pub fn pixel_compare(a: &Rgba16Image, b: &Rgba16Image) -> MetricOutput {
    let (width, height) = a.dimensions();
    let mut diff = RgbaImage::from_pixel(width, height, BLACK);
    let mut num_failed: u64 = 0;

    for ((pa, pb), out) in a.pixels().zip(b.pixels()).zip(diff.pixels_mut()) {
        if pa != pb {
            num_failed += 1;
            *out = WHITE;
        }
    }

    let total = u64::from(width) * u64::from(height);
    MetricOutput {
        index: fraction(total - num_failed, total),
        num_failed: num_failed as i64,
        diff,
    }
}
