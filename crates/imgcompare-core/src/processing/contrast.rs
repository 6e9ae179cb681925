use image::RgbaImage;

use super::luminance::{fraction, gray_pixel, gray_value, Rgba16Image, BLACK};
use super::MetricOutput;

/// Maximum luminance difference for two pixels to still match
pub const CONTRAST_THRESHOLD: f64 = 0.25;

/// Per-pixel luminance comparison.
///
/// Failing pixels are drawn with an intensity equal to the luminance gap.
pub fn contrast_compare(a: &Rgba16Image, b: &Rgba16Image) -> MetricOutput {
    let (width, height) = a.dimensions();
    let mut diff = RgbaImage::from_pixel(width, height, BLACK);
    let mut num_failed: u64 = 0;

    for ((pa, pb), out) in a.pixels().zip(b.pixels()).zip(diff.pixels_mut()) {
        let delta = (gray_value(pa) - gray_value(pb)).abs();
        if exceeds_threshold(delta) {
            num_failed += 1;
            *out = gray_pixel(delta);
        }
    }

    let total = u64::from(width) * u64::from(height);
    MetricOutput {
        index: fraction(total - num_failed, total),
        num_failed: num_failed as i64,
        diff,
    }
}

/// A gap of exactly the threshold still matches
#[inline]
fn exceeds_threshold(delta: f64) -> bool {
    delta > CONTRAST_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::test_support::*;
    use image::Rgba;

    #[test]
    fn test_small_shift_within_threshold() {
        // 20% brighter everywhere stays under the threshold
        let a = solid(6, 6, 30000);
        let b = solid(6, 6, 30000 + 13107);

        let output = contrast_compare(&a, &b);
        assert_eq!(output.index, 1.0);
        assert_eq!(output.num_failed, 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(!exceeds_threshold(CONTRAST_THRESHOLD));
        assert!(exceeds_threshold(CONTRAST_THRESHOLD + 1e-9));

        // 16383/65535 sits just under a quarter, 16384/65535 just over
        let a = black(2, 1);
        let mut b = black(2, 1);
        b.put_pixel(0, 0, Rgba([16383, 16383, 16383, 65535]));
        b.put_pixel(1, 0, Rgba([16384, 16384, 16384, 65535]));

        let output = contrast_compare(&a, &b);
        assert_eq!(output.num_failed, 1);
        assert_eq!(*output.diff.get_pixel(0, 0), BLACK);
        assert_ne!(*output.diff.get_pixel(1, 0), BLACK);
    }

    #[test]
    fn test_white_vs_black() {
        let output = contrast_compare(&white(4, 3), &black(4, 3));
        assert_eq!(output.index, 0.0);
        assert_eq!(output.num_failed, 12);
        assert!(output.diff.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_diff_intensity_tracks_gap() {
        let a = black(2, 1);
        let mut b = black(2, 1);
        b.put_pixel(0, 0, Rgba([32768, 32768, 32768, 65535]));

        let output = contrast_compare(&a, &b);
        assert_eq!(output.num_failed, 1);
        assert_eq!(output.index, 0.5);
        assert_eq!(*output.diff.get_pixel(0, 0), Rgba([128, 128, 128, 255]));
        assert_eq!(*output.diff.get_pixel(1, 0), BLACK);
    }
}
