use image::RgbaImage;

use super::luminance::{fraction, gray_pixel, gray_value, Rgba16Image, BLACK};
use super::MetricOutput;
use crate::error::{Error, Result};
use crate::types::ComparisonKind;

/// Maximum difference of block-average luminance for two blocks to match
pub const QUAD_THRESHOLD: f64 = 0.5;

/// Compare the average luminance of non-overlapping 2x2 blocks.
///
/// Both dimensions must be even. The failure count is expressed in pixels:
/// every failing block contributes 4.
pub fn quad_compare(a: &Rgba16Image, b: &Rgba16Image) -> Result<MetricOutput> {
    let (width, height) = a.dimensions();
    if width % 2 != 0 || height % 2 != 0 {
        return Err(Error::Dimension {
            kind: ComparisonKind::Quad,
            width,
            height,
        });
    }

    let mut diff = RgbaImage::from_pixel(width, height, BLACK);
    let mut failed_blocks: u64 = 0;

    for y in (0..height).step_by(2) {
        for x in (0..width).step_by(2) {
            let delta = (block_average(a, x, y) - block_average(b, x, y)).abs();
            if delta > QUAD_THRESHOLD {
                failed_blocks += 1;
                let color = gray_pixel(delta);
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    diff.put_pixel(x + dx, y + dy, color);
                }
            }
        }
    }

    let total = u64::from(width) * u64::from(height);
    let num_failed = failed_blocks * 4;
    Ok(MetricOutput {
        index: fraction(total - num_failed, total),
        num_failed: num_failed as i64,
        diff,
    })
}

fn block_average(img: &Rgba16Image, x: u32, y: u32) -> f64 {
    let sum = gray_value(img.get_pixel(x, y))
        + gray_value(img.get_pixel(x + 1, y))
        + gray_value(img.get_pixel(x, y + 1))
        + gray_value(img.get_pixel(x + 1, y + 1));
    sum / 4.0
}
