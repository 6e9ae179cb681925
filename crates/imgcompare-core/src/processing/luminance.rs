use image::{ImageBuffer, Rgba};

/// 16-bit RGBA buffer shared by all kernels
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

pub(crate) const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub(crate) const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Relative luminance of a pixel normalized to [0, 1]
#[inline]
pub fn gray_value(pixel: &Rgba<u16>) -> f64 {
    let [r, g, b, _] = pixel.0;
    let gray = 0.2125 * f64::from(r) + 0.7154 * f64::from(g) + 0.0721 * f64::from(b);
    gray / f64::from(u16::MAX)
}

/// 8-bit luma using integer 299/587/114 weights
#[inline]
pub fn luma8(pixel: &Rgba<u16>) -> u8 {
    let [r, g, b, _] = pixel.0;
    let y = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114 + 500) / 1000;
    (y >> 8) as u8
}

/// Opaque gray pixel for an intensity in [0, 1]
#[inline]
pub(crate) fn gray_pixel(intensity: f64) -> Rgba<u8> {
    let v = (intensity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([v, v, v, 255])
}

/// `matching / total`, treating an empty image as a perfect match
#[inline]
pub(crate) fn fraction(matching: u64, total: u64) -> f64 {
    if total == 0 {
        1.0
    } else {
        matching as f64 / total as f64
    }
}
