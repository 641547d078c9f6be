//! Representative page color from the largest embedded image.
//!
//! Per page, images are offered to a [`ColorPicker`] in document order. The
//! picker keeps the running largest area and only decodes an image when it
//! beats both the area floor and the current best, so small decorations are
//! never decoded at all. The winning bitmap is composited over white,
//! downscaled to a square and its pixels averaged per channel.

use crate::error::ItemError;
use crate::output::Rgb;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, RgbaImage};
use tracing::debug;

/// Outcome of sampling one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSample {
    /// White when no image qualified.
    pub color: Rgb,
    /// Images decoded and averaged successfully.
    pub considered: usize,
    pub failed: usize,
}

/// Incremental largest-image selection for one page.
#[derive(Debug)]
pub struct ColorPicker {
    page: usize,
    min_area: f32,
    sample_size: u32,
    best_area: f32,
    best: Option<Rgb>,
    considered: usize,
    failed: usize,
}

impl ColorPicker {
    pub fn new(page: usize, min_area: f32, sample_size: u32) -> Self {
        Self {
            page,
            min_area,
            sample_size: sample_size.max(1),
            best_area: 0.0,
            best: None,
            considered: 0,
            failed: 0,
        }
    }

    /// Offer an image of `area` pt². `load` runs only if the image would
    /// become the new best; a failed load leaves the previous best intact.
    pub fn offer<F>(&mut self, area: f32, load: F)
    where
        F: FnOnce() -> Result<DynamicImage, ItemError>,
    {
        if !(area > self.min_area && area > self.best_area) {
            return;
        }
        match load() {
            Ok(img) => {
                self.best = Some(average_color(&img, self.sample_size));
                self.best_area = area;
                self.considered += 1;
            }
            Err(e) => self.record_failure(e),
        }
    }

    /// Count an image that could not be measured or decoded.
    pub fn record_failure(&mut self, err: ItemError) {
        debug!("Page {}: skipping image: {}", self.page, err);
        self.failed += 1;
    }

    pub fn finish(self) -> PageSample {
        PageSample {
            color: self.best.unwrap_or(Rgb::WHITE),
            considered: self.considered,
            failed: self.failed,
        }
    }
}

/// Composite over white, downscale to `size`×`size` and take the
/// per-channel mean, truncated.
pub fn average_color(img: &DynamicImage, size: u32) -> Rgb {
    let opaque = if img.color().has_alpha() {
        DynamicImage::ImageRgb8(flatten_on_white(&img.to_rgba8()))
    } else {
        img.clone()
    };
    let sample = opaque.resize_exact(size, size, FilterType::Triangle).to_rgb8();

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    let mut n = 0u64;
    for px in sample.pixels() {
        r += px[0] as u64;
        g += px[1] as u64;
        b += px[2] as u64;
        n += 1;
    }
    if n == 0 {
        return Rgb::WHITE;
    }
    Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

/// Blend each pixel over a white page, as a viewer would show it.
fn flatten_on_white(img: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a)) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
