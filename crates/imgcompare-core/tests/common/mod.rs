#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// Save a solid color PNG
pub fn solid_png(dir: &Path, name: &str, width: u32, height: u32, value: u8) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
        .save(&path)
        .unwrap();
    path
}

/// A synthetic "screenshot": gradient background with a few UI-like boxes
pub fn screenshot(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if (8..24).contains(&x) && (8..16).contains(&y) {
            Rgba([30, 30, 200, 255])
        } else {
            let r = (x * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            Rgba([r, g, 128, 255])
        }
    })
}

/// `screenshot` with a small region changed, like two near-identical captures
pub fn screenshot_variant(width: u32, height: u32) -> RgbaImage {
    let mut img = screenshot(width, height);
    for y in 20..24 {
        for x in 30..36 {
            img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }
    // A one-level nudge that only exact comparison notices
    img.put_pixel(1, 1, Rgba([1, 0, 128, 255]));
    img
}

pub fn save(dir: &Path, name: &str, img: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    img.save(&path).unwrap();
    path
}

/// Two mirrored trees:
///
/// ```text
/// A/                      B/
///   diff.png  (white)       diff.png  (black)
///   same.png  (gray)        same.png  (gray)
///   only_a.png              only_b.png
///   readme.txt              readme.txt
///   nested/screen.png       nested/screen.png (variant)
///   lonely/x.png
/// ```
pub fn mirrored_trees(root: &Path) -> (PathBuf, PathBuf) {
    let a = root.join("A");
    let b = root.join("B");

    solid_png(&a, "diff.png", 8, 8, 255);
    solid_png(&b, "diff.png", 8, 8, 0);
    solid_png(&a, "same.png", 8, 8, 90);
    solid_png(&b, "same.png", 8, 8, 90);
    solid_png(&a, "only_a.png", 8, 8, 0);
    solid_png(&b, "only_b.png", 8, 8, 0);
    fs::write(a.join("readme.txt"), b"text").unwrap();
    fs::write(b.join("readme.txt"), b"text").unwrap();
    save(&a, "nested/screen.png", &screenshot(64, 48));
    save(&b, "nested/screen.png", &screenshot_variant(64, 48));
    solid_png(&a, "lonely/x.png", 8, 8, 0);

    (a, b)
}
