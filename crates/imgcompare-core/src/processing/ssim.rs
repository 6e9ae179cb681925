use image::RgbaImage;

use super::luminance::{gray_pixel, luma8, Rgba16Image};
use super::MetricOutput;

/// `(0.01 * 255)^2`
pub const SSIM_C1: f64 = 6.5025;
/// `(0.03 * 255)^2`
pub const SSIM_C2: f64 = 58.5225;

/// Global single-window structural similarity on 8-bit luma.
///
/// The diff image is a per-pixel map that substitutes each pixel's
/// covariance term for the global covariance.
pub fn ssim_compare(a: &Rgba16Image, b: &Rgba16Image) -> MetricOutput {
    let (width, height) = a.dimensions();
    let gray_a: Vec<f64> = a.pixels().map(|p| f64::from(luma8(p))).collect();
    let gray_b: Vec<f64> = b.pixels().map(|p| f64::from(luma8(p))).collect();

    if gray_a.is_empty() {
        return MetricOutput {
            index: 1.0,
            num_failed: -1,
            diff: RgbaImage::new(width, height),
        };
    }

    let mean_a = mean(&gray_a);
    let mean_b = mean(&gray_b);
    let variance_a = variance(&gray_a, mean_a);
    let variance_b = variance(&gray_b, mean_b);
    let (covariance, products) = covariance(&gray_a, &gray_b, mean_a, mean_b);

    let luminance_term = 2.0 * mean_a * mean_b + SSIM_C1;
    let denominator =
        (mean_a * mean_a + mean_b * mean_b + SSIM_C1) * (variance_a + variance_b + SSIM_C2);

    let ssim = (luminance_term * (2.0 * covariance + SSIM_C2)) / denominator;

    let mut diff = RgbaImage::new(width, height);
    for (out, product) in diff.pixels_mut().zip(products.iter()) {
        let local = ((luminance_term * (2.0 * product + SSIM_C2)) / denominator).abs();
        *out = gray_pixel(local);
    }

    MetricOutput {
        index: ssim.abs(),
        num_failed: -1,
        diff,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64
}

/// Population covariance plus the per-pixel products it averages
fn covariance(a: &[f64], b: &[f64], mean_a: f64, mean_b: f64) -> (f64, Vec<f64>) {
    let products: Vec<f64> = a
        .iter()
        .zip(b)
        .map(|(va, vb)| (va - mean_a) * (vb - mean_b))
        .collect();
    let cov = products.iter().sum::<f64>() / a.len() as f64;
    (cov, products)
}
