use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::color::{BLACK, GRID_GRAY};
use crate::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// Canvas – clipped drawing primitives over an RGB buffer
// ---------------------------------------------------------------------------

/// An RGB raster. All drawing is clipped to the image bounds, so callers may
/// pass coordinates outside it.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Canvas {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64 {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Fill the rectangle spanned by two corners, inclusive.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        let (left, right) = (x0.min(x1).max(0), x0.max(x1).min(self.width() as i64 - 1));
        let (top, bottom) = (y0.min(y1).max(0), y0.max(y1).min(self.height() as i64 - 1));
        for y in top..=bottom {
            for x in left..=right {
                self.put(x, y, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, width: i64, color: Rgb<u8>) {
        self.line(x0, y0, x1, y0, width, color);
        self.line(x1, y0, x1, y1, width, color);
        self.line(x1, y1, x0, y1, width, color);
        self.line(x0, y1, x0, y0, width, color);
    }

    /// Bresenham line with a square pen of `width` pixels.
    pub fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, width: i64, color: Rgb<u8>) {
        let pen = width.max(1);
        let half = (pen - 1) / 2;
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            let (px, py) = (x - half, y - half);
            self.fill_rect(px, py, px + pen - 1, py + pen - 1, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn fill_circle(&mut self, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
        for y in -radius..=radius {
            for x in -radius..=radius {
                if x * x + y * y <= radius * radius {
                    self.put(cx + x, cy + y, color);
                }
            }
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    /// Encode the canvas as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        if bytes.is_empty() {
            return Err(DatasetError::Render("PNG encoder produced no output".into()));
        }
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// PlotArea – data space → pixel space
// ---------------------------------------------------------------------------

/// The framed region of a canvas that data is drawn into.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl PlotArea {
    /// Frame with fractional margins on each side, matching the usual
    /// single-axes figure layout.
    pub fn framed(canvas: &Canvas, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self::panel(canvas, 0, 1, x_range, y_range)
    }

    /// Frame the `index`-th of `count` side-by-side panels, each with the
    /// same fractional margins as a single-axes figure.
    pub fn panel(
        canvas: &Canvas,
        index: u32,
        count: u32,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> Self {
        let count = count.max(1);
        let w = canvas.width() as f64 / count as f64;
        let h = canvas.height() as f64;
        let offset = w * index.min(count - 1) as f64;
        PlotArea {
            left: (offset + w * 0.125) as i64,
            right: (offset + w * 0.9) as i64,
            top: (h * 0.12) as i64,
            bottom: (h * 0.89) as i64,
            x_range: widen(x_range),
            y_range: widen(y_range),
        }
    }

    pub fn x_px(&self, x: f64) -> i64 {
        let (lo, hi) = self.x_range;
        let t = (x - lo) / (hi - lo);
        self.left + (t * (self.right - self.left) as f64).round() as i64
    }

    pub fn y_px(&self, y: f64) -> i64 {
        let (lo, hi) = self.y_range;
        let t = (y - lo) / (hi - lo);
        self.bottom - (t * (self.bottom - self.top) as f64).round() as i64
    }

    /// Draw the frame, light grid lines and outward tick marks.
    pub fn draw_axes(&self, canvas: &mut Canvas, ticks: usize) {
        let tick_len = ((self.bottom - self.top) / 80).max(4);
        for i in 0..=ticks {
            let t = i as f64 / ticks as f64;
            let x = self.left + ((self.right - self.left) as f64 * t).round() as i64;
            let y = self.bottom - ((self.bottom - self.top) as f64 * t).round() as i64;
            canvas.line(x, self.top, x, self.bottom, 1, GRID_GRAY);
            canvas.line(self.left, y, self.right, y, 1, GRID_GRAY);
            canvas.line(x, self.bottom, x, self.bottom + tick_len, 3, BLACK);
            canvas.line(self.left - tick_len, y, self.left, y, 3, BLACK);
        }
        canvas.stroke_rect(self.left, self.top, self.right, self.bottom, 3, BLACK);
    }
}

/// Guard against zero-width ranges so mapping never divides by zero.
fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}
