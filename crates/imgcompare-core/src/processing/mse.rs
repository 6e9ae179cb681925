use image::RgbaImage;

use super::luminance::{gray_pixel, Rgba16Image};
use super::MetricOutput;

/// Mean squared error over R, G and B normalized to [0, 1], reported as
/// `1 - MSE`. Alpha is ignored.
pub fn mse_compare(a: &Rgba16Image, b: &Rgba16Image) -> MetricOutput {
    let (width, height) = a.dimensions();
    let mut diff = RgbaImage::new(width, height);
    let mut sum_squared_error = 0.0;

    for ((pa, pb), out) in a.pixels().zip(b.pixels()).zip(diff.pixels_mut()) {
        let squared: f64 = (0..3)
            .map(|c| {
                let e = normalize(pa.0[c]) - normalize(pb.0[c]);
                e * e
            })
            .sum();
        let sqe = squared / 3.0;

        *out = gray_pixel(sqe);
        sum_squared_error += sqe;
    }

    let total = u64::from(width) * u64::from(height);
    let index = if total == 0 {
        1.0
    } else {
        1.0 - sum_squared_error / total as f64
    };

    MetricOutput {
        index,
        num_failed: -1,
        diff,
    }
}

#[inline]
fn normalize(channel: u16) -> f64 {
    f64::from(channel) / f64::from(u16::MAX)
}
