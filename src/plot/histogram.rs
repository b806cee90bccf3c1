use log::debug;

use super::canvas::{Canvas, PlotArea};
use crate::color::{BLACK, SERIES_BLUE, WHITE};
use crate::data::model::Table;
use crate::error::{DatasetError, Result};

/// Columns the passenger age view projects; all must be present.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Pclass", "Survived", "Age"];
pub const AGE_COLUMN: &str = "Age";
pub const AGE_BINS: usize = 80;

/// Rendered figure size: a 6.4 x 4.8 inch figure at 300 dpi.
pub const FIGURE_WIDTH: u32 = 1920;
pub const FIGURE_HEIGHT: u32 = 1440;

// ---------------------------------------------------------------------------
// Binning
// ---------------------------------------------------------------------------

/// Equal-width bins: `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width buckets spanning their min/max.
    /// The last bucket is closed on the right. A degenerate range is widened
    /// by half a unit each way.
    pub fn from_values(values: &[f64], bins: usize) -> Result<Self> {
        if values.is_empty() || bins == 0 {
            return Err(DatasetError::Render("no data to plot".into()));
        }
        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !lo.is_finite() || !hi.is_finite() {
            return Err(DatasetError::Render("values must be finite to bin".into()));
        }
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0u64; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Ok(Histogram { edges, counts })
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Bin the `Age` column of a passenger table into [`AGE_BINS`] buckets,
/// skipping rows whose age is missing.
pub fn age_histogram(table: &Table) -> Result<Histogram> {
    for name in REQUIRED_COLUMNS {
        if !table.has_column(name) {
            return Err(DatasetError::NotFound(format!("column '{name}'")));
        }
    }
    let age = table
        .column(AGE_COLUMN)
        .ok_or_else(|| DatasetError::NotFound(format!("column '{AGE_COLUMN}'")))?;
    if !age.dtype.is_numeric() {
        return Err(DatasetError::Render(format!(
            "column '{AGE_COLUMN}' is not numeric"
        )));
    }

    let ages: Vec<f64> = age.values.iter().filter_map(|v| v.as_f64()).collect();
    debug!(
        "age histogram: {} of {} rows have an age",
        ages.len(),
        table.len()
    );
    Histogram::from_values(&ages, AGE_BINS)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the passenger age histogram as a PNG.
pub fn render_age_histogram(table: &Table) -> Result<Vec<u8>> {
    let hist = age_histogram(table)?;
    render_histogram(&hist, FIGURE_WIDTH, FIGURE_HEIGHT)
}

/// Draw `hist` as adjacent bars at the given resolution.
pub fn render_histogram(hist: &Histogram, width: u32, height: u32) -> Result<Vec<u8>> {
    let (first, last) = match (hist.edges.first(), hist.edges.last()) {
        (Some(&first), Some(&last)) if !hist.counts.is_empty() => (first, last),
        _ => return Err(DatasetError::Render("histogram has no bins".into())),
    };
    let peak = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let pad = (last - first) * 0.05;

    let mut canvas = Canvas::new(width, height, WHITE);
    let area = PlotArea::framed(&canvas, (first - pad, last + pad), (0.0, peak * 1.05));
    area.draw_axes(&mut canvas, 5);

    for (i, &count) in hist.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let x0 = area.x_px(hist.edges[i]);
        let x1 = area.x_px(hist.edges[i + 1]);
        let y = area.y_px(count as f64);
        canvas.fill_rect(x0, y, x1, area.y_px(0.0), SERIES_BLUE);
        canvas.stroke_rect(x0, y, x1, area.y_px(0.0), 1, BLACK);
    }
    canvas.encode_png()
}
