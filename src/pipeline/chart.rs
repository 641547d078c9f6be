//! PNG charts drawn with `imageproc`.
//!
//! Neither chart carries text, which keeps the crate free of font assets.
//! The sentiment chart maps `[-1, 1]` onto the plot height; the color strip
//! is one row of equal-width cells, one per page.

use crate::output::Rgb;
use image::{Rgb as Px, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;

pub const SENTIMENT_WIDTH: u32 = 1200;
pub const SENTIMENT_HEIGHT: u32 = 600;
pub const STRIP_WIDTH: u32 = 1200;
pub const STRIP_HEIGHT: u32 = 200;

const MARGIN_X: f32 = 60.0;
const MARGIN_Y: f32 = 40.0;
const STRIP_MARGIN: u32 = 10;

const WHITE: Px<u8> = Px([255, 255, 255]);
const BLACK: Px<u8> = Px([0, 0, 0]);
const RAW_GRAY: Px<u8> = Px([200, 200, 200]);
const TREND_BLUE: Px<u8> = Px([0, 0, 255]);
const ZERO_RED: Px<u8> = Px([220, 0, 0]);

/// Trailing moving average; `None` until `window` values are available.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        out.push((i + 1 >= window).then(|| sum / window as f64));
    }
    out
}

struct Plot {
    x0: f32,
    y0: f32,
    width: f32,
    height: f32,
    n: usize,
}

impl Plot {
    fn x(&self, i: usize) -> f32 {
        if self.n <= 1 {
            self.x0 + self.width / 2.0
        } else {
            self.x0 + self.width * i as f32 / (self.n - 1) as f32
        }
    }

    fn y(&self, score: f64) -> f32 {
        let s = score.clamp(-1.0, 1.0) as f32;
        self.y0 + (1.0 - s) / 2.0 * self.height
    }
}

/// Raw scores in light gray, the trend in blue, a dashed red zero line.
pub fn render_sentiment_chart(scores: &[f64], window: usize) -> RgbImage {
    let mut img = RgbImage::from_pixel(SENTIMENT_WIDTH, SENTIMENT_HEIGHT, WHITE);
    let plot = Plot {
        x0: MARGIN_X,
        y0: MARGIN_Y,
        width: SENTIMENT_WIDTH as f32 - 2.0 * MARGIN_X,
        height: SENTIMENT_HEIGHT as f32 - 2.0 * MARGIN_Y,
        n: scores.len(),
    };

    draw_dashed_hline(&mut img, plot.x0, plot.x0 + plot.width, plot.y(0.0), ZERO_RED);

    if scores.len() == 1 {
        draw_filled_circle_mut(
            &mut img,
            (plot.x(0) as i32, plot.y(scores[0]) as i32),
            3,
            RAW_GRAY,
        );
    }
    for (i, pair) in scores.windows(2).enumerate() {
        draw_line_segment_mut(
            &mut img,
            (plot.x(i), plot.y(pair[0])),
            (plot.x(i + 1), plot.y(pair[1])),
            RAW_GRAY,
        );
    }

    let trend = moving_average(scores, window);
    for i in 1..trend.len() {
        if let (Some(a), Some(b)) = (trend[i - 1], trend[i]) {
            let (xa, ya, xb, yb) = (plot.x(i - 1), plot.y(a), plot.x(i), plot.y(b));
            draw_line_segment_mut(&mut img, (xa, ya), (xb, yb), TREND_BLUE);
            draw_line_segment_mut(&mut img, (xa, ya + 1.0), (xb, yb + 1.0), TREND_BLUE);
        }
    }

    draw_hollow_rect_mut(
        &mut img,
        Rect::at(plot.x0 as i32, plot.y0 as i32).of_size(plot.width as u32, plot.height as u32),
        BLACK,
    );
    img
}

fn draw_dashed_hline(img: &mut RgbImage, from: f32, to: f32, y: f32, color: Px<u8>) {
    const DASH: f32 = 10.0;
    const GAP: f32 = 6.0;
    let mut x = from;
    while x < to {
        let end = (x + DASH).min(to);
        draw_line_segment_mut(img, (x, y), (end, y), color);
        x = end + GAP;
    }
}

/// One cell per page, left to right, page colors unchanged.
///
/// The strip is [`STRIP_WIDTH`] wide unless there are more pages than inner
/// pixels; then it widens so every page keeps at least a 1px cell.
pub fn render_color_strip(colors: &[Rgb]) -> RgbImage {
    let n = colors.len();
    let width = STRIP_WIDTH.max(n as u32 + 2 * STRIP_MARGIN);
    let mut img = RgbImage::from_pixel(width, STRIP_HEIGHT, WHITE);
    if colors.is_empty() {
        return img;
    }

    let inner_w = (width - 2 * STRIP_MARGIN) as usize;
    let inner_h = STRIP_HEIGHT - 2 * STRIP_MARGIN;

    for (i, c) in colors.iter().enumerate() {
        let start = i * inner_w / n;
        let end = (i + 1) * inner_w / n;
        draw_filled_rect_mut(
            &mut img,
            Rect::at((STRIP_MARGIN as usize + start) as i32, STRIP_MARGIN as i32)
                .of_size((end - start) as u32, inner_h),
            Px([c.r, c.g, c.b]),
        );
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_waits_for_full_window() {
        let ma = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 5);
        assert_eq!(ma[..4], [None, None, None, None]);
        assert_eq!(ma[4], Some(3.0));
        assert_eq!(ma[5], Some(4.0));
    }

    #[test]
    fn moving_average_shorter_than_window_is_all_none() {
        assert!(moving_average(&[0.5, 0.5], 5).iter().all(Option::is_none));
    }

    #[test]
    fn sentiment_chart_dimensions_and_frame() {
        let img = render_sentiment_chart(&[0.5, -0.5, 0.0, 0.9, -0.9, 0.2], 5);
        assert_eq!(img.dimensions(), (SENTIMENT_WIDTH, SENTIMENT_HEIGHT));
        assert_eq!(*img.get_pixel(0, 0), WHITE);
        assert_eq!(*img.get_pixel(MARGIN_X as u32, MARGIN_Y as u32), BLACK);
    }

    #[test]
    fn single_score_does_not_panic() {
        let img = render_sentiment_chart(&[0.3], 5);
        assert_eq!(img.width(), SENTIMENT_WIDTH);
    }

    #[test]
    fn strip_cells_follow_page_order() {
        let colors = [Rgb::new(255, 0, 0), Rgb::WHITE, Rgb::new(0, 0, 255)];
        let img = render_color_strip(&colors);
        let y = STRIP_HEIGHT / 2;
        assert_eq!(*img.get_pixel(STRIP_MARGIN + 5, y), Px([255, 0, 0]));
        assert_eq!(*img.get_pixel(STRIP_WIDTH - STRIP_MARGIN - 5, y), Px([0, 0, 255]));
        // Margin stays white.
        assert_eq!(*img.get_pixel(2, 2), WHITE);
    }

    #[test]
    fn every_page_keeps_a_cell_when_pages_outnumber_pixels() {
        let colors: Vec<Rgb> = (0..5000u32)
            .map(|i| Rgb::new((i % 256) as u8, (i / 256) as u8, 7))
            .collect();
        let img = render_color_strip(&colors);
        assert_eq!(img.dimensions(), (5000 + 2 * STRIP_MARGIN, STRIP_HEIGHT));
        let y = STRIP_HEIGHT / 2;
        for (i, c) in colors.iter().enumerate() {
            assert_eq!(
                *img.get_pixel(STRIP_MARGIN + i as u32, y),
                Px([c.r, c.g, c.b]),
                "page {}",
                i + 1
            );
        }
    }

    #[test]
    fn strip_width_is_fixed_up_to_inner_width() {
        let colors = vec![Rgb::new(1, 2, 3); (STRIP_WIDTH - 2 * STRIP_MARGIN) as usize];
        let img = render_color_strip(&colors);
        assert_eq!(img.dimensions(), (STRIP_WIDTH, STRIP_HEIGHT));
        assert_eq!(*img.get_pixel(STRIP_WIDTH - STRIP_MARGIN - 1, 100), Px([1, 2, 3]));
    }
}
