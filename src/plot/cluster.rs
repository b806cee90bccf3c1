use std::collections::BTreeSet;

use super::canvas::{Canvas, PlotArea};
use crate::color::{ColorMap, BLACK, MARKER_RED, SERIES_BLUE, WHITE};
use crate::error::{DatasetError, Result};

pub const SCORE_FIGURE: (u32, u32) = (2400, 1500);
pub const SCATTER_FIGURE: (u32, u32) = (1920, 1440);
pub const SILHOUETTE_FIGURE: (u32, u32) = (3600, 1400);

/// Empty rows left between clusters in the silhouette panel.
const CLUSTER_GAP: f64 = 10.0;

/// Which per-k statistic a score curve shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    /// Within-cluster sum of squares; the "elbow" diagram.
    Inertia,
    /// Mean silhouette coefficient per k.
    Silhouette,
}

// ---------------------------------------------------------------------------
// Score curves (elbow / silhouette score vs. k)
// ---------------------------------------------------------------------------

/// Plot one score per cluster count `k` as a marked polyline.
pub fn render_score_curve(ks: &[usize], scores: &[f64], kind: ScoreKind) -> Result<Vec<u8>> {
    if ks.is_empty() || ks.len() != scores.len() {
        return Err(DatasetError::Render(format!(
            "{kind:?} curve needs one score per k (got {} k, {} scores)",
            ks.len(),
            scores.len()
        )));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(DatasetError::Render(format!("{kind:?} scores must be finite")));
    }

    let x_range = min_max(ks.iter().map(|&k| k as f64));
    let y_range = match kind {
        ScoreKind::Silhouette => {
            let (lo, hi) = min_max(scores.iter().copied());
            (lo.min(0.0), hi.max(0.0))
        }
        ScoreKind::Inertia => min_max(scores.iter().copied()),
    };

    let (width, height) = SCORE_FIGURE;
    let mut canvas = Canvas::new(width, height, WHITE);
    let area = PlotArea::framed(&canvas, pad(x_range), pad(y_range));
    area.draw_axes(&mut canvas, ks.len().clamp(1, 10));

    let points: Vec<(i64, i64)> = ks
        .iter()
        .zip(scores)
        .map(|(&k, &s)| (area.x_px(k as f64), area.y_px(s)))
        .collect();
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        canvas.line(x0, y0, x1, y1, 5, SERIES_BLUE);
    }
    for &(x, y) in &points {
        canvas.fill_circle(x, y, 12, SERIES_BLUE);
    }
    canvas.encode_png()
}

// ---------------------------------------------------------------------------
// Cluster assignment scatter
// ---------------------------------------------------------------------------

/// Scatter 2-D points coloured by cluster label, with each centroid drawn as
/// a larger black-rimmed white marker.
pub fn render_cluster_scatter(
    points: &[[f64; 2]],
    labels: &[usize],
    centers: &[[f64; 2]],
) -> Result<Vec<u8>> {
    check_scatter(points, labels, centers)?;
    let colors = ColorMap::new(&labels.iter().copied().collect::<BTreeSet<_>>());

    let (width, height) = SCATTER_FIGURE;
    let mut canvas = Canvas::new(width, height, WHITE);
    let area = scatter_area(&canvas, 0, 1, points, centers);
    draw_scatter(&mut canvas, &area, points, labels, centers, &colors);
    canvas.encode_png()
}

fn check_scatter(points: &[[f64; 2]], labels: &[usize], centers: &[[f64; 2]]) -> Result<()> {
    if points.is_empty() || points.len() != labels.len() {
        return Err(DatasetError::Render(format!(
            "scatter needs one label per point (got {} points, {} labels)",
            points.len(),
            labels.len()
        )));
    }
    if points.iter().chain(centers).flatten().any(|v| !v.is_finite()) {
        return Err(DatasetError::Render("coordinates must be finite".into()));
    }
    Ok(())
}

fn scatter_area(
    canvas: &Canvas,
    index: u32,
    count: u32,
    points: &[[f64; 2]],
    centers: &[[f64; 2]],
) -> PlotArea {
    let all = points.iter().chain(centers);
    let x_range = min_max(all.clone().map(|p| p[0]));
    let y_range = min_max(all.map(|p| p[1]));
    PlotArea::panel(canvas, index, count, pad(x_range), pad(y_range))
}

fn draw_scatter(
    canvas: &mut Canvas,
    area: &PlotArea,
    points: &[[f64; 2]],
    labels: &[usize],
    centers: &[[f64; 2]],
    colors: &ColorMap,
) {
    area.draw_axes(canvas, 5);
    for (p, &label) in points.iter().zip(labels) {
        canvas.fill_circle(area.x_px(p[0]), area.y_px(p[1]), 6, colors.color_for(label));
    }
    for c in centers {
        let (x, y) = (area.x_px(c[0]), area.y_px(c[1]));
        canvas.fill_circle(x, y, 22, BLACK);
        canvas.fill_circle(x, y, 17, WHITE);
    }
}

// ---------------------------------------------------------------------------
// Silhouette analysis (per-sample coefficients beside the assignment)
// ---------------------------------------------------------------------------

/// Two-panel silhouette analysis for one clustering.
///
/// The left panel stacks each cluster's per-sample silhouette coefficients
/// as sorted horizontal bars, clusters in label order separated by a gap,
/// with a dashed line at `average`. The right panel is the cluster scatter
/// in the same colours.
pub fn render_silhouette_analysis(
    points: &[[f64; 2]],
    sample_scores: &[f64],
    labels: &[usize],
    average: f64,
    centers: &[[f64; 2]],
) -> Result<Vec<u8>> {
    check_scatter(points, labels, centers)?;
    if sample_scores.len() != points.len() {
        return Err(DatasetError::Render(format!(
            "silhouette needs one score per point (got {} points, {} scores)",
            points.len(),
            sample_scores.len()
        )));
    }
    if !average.is_finite() || sample_scores.iter().any(|s| !s.is_finite()) {
        return Err(DatasetError::Render("silhouette scores must be finite".into()));
    }

    let clusters: BTreeSet<usize> = labels.iter().copied().collect();
    let colors = ColorMap::new(&clusters);
    let lowest = sample_scores.iter().copied().fold(average, f64::min);
    let rows = points.len() as f64 + (clusters.len() as f64 + 1.0) * CLUSTER_GAP;

    let (width, height) = SILHOUETTE_FIGURE;
    let mut canvas = Canvas::new(width, height, WHITE);
    let bars = PlotArea::panel(&canvas, 0, 2, (lowest.min(-0.1), 1.0), (0.0, rows));
    bars.draw_axes(&mut canvas, 10);

    let zero = bars.x_px(0.0);
    let mut y_lower = CLUSTER_GAP;
    for &cluster in &clusters {
        let mut scores: Vec<f64> = labels
            .iter()
            .zip(sample_scores)
            .filter(|(label, _)| **label == cluster)
            .map(|(_, &s)| s)
            .collect();
        scores.sort_by(f64::total_cmp);

        let color = colors.color_for(cluster);
        for (i, &score) in scores.iter().enumerate() {
            let y = y_lower + i as f64;
            canvas.fill_rect(zero, bars.y_px(y + 1.0), bars.x_px(score), bars.y_px(y), color);
        }
        y_lower += scores.len() as f64 + CLUSTER_GAP;
    }

    let x = bars.x_px(average);
    let (dash, space) = (30, 20);
    let mut y = bars.top;
    while y < bars.bottom {
        canvas.line(x, y, x, (y + dash).min(bars.bottom), 4, MARKER_RED);
        y += dash + space;
    }

    let scatter = scatter_area(&canvas, 1, 2, points, centers);
    draw_scatter(&mut canvas, &scatter, points, labels, centers, &colors);
    canvas.encode_png()
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    let margin = ((hi - lo) * 0.05).max(0.05);
    (lo - margin, hi + margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimensions(png: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory(png).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn elbow_curve_renders() {
        let png = render_score_curve(&[2, 3, 4, 5], &[910.0, 420.5, 300.2, 280.0], ScoreKind::Inertia)
            .unwrap();
        assert_eq!(dimensions(&png), SCORE_FIGURE);
    }

    #[test]
    fn silhouette_curve_renders_single_point() {
        let png = render_score_curve(&[3], &[0.41], ScoreKind::Silhouette).unwrap();
        assert_eq!(dimensions(&png), SCORE_FIGURE);
    }

    #[test]
    fn mismatched_scores_are_rejected() {
        let err = render_score_curve(&[2, 3], &[1.0], ScoreKind::Inertia).unwrap_err();
        assert!(matches!(err, DatasetError::Render(_)));
        let err = render_score_curve(&[], &[], ScoreKind::Inertia).unwrap_err();
        assert!(matches!(err, DatasetError::Render(_)));
    }

    #[test]
    fn scatter_renders_clusters_and_centers() {
        let points = [[0.0, 0.0], [0.2, 0.1], [5.0, 5.0], [5.1, 4.8]];
        let labels = [0, 0, 1, 1];
        let centers = [[0.1, 0.05], [5.05, 4.9]];
        let png = render_cluster_scatter(&points, &labels, &centers).unwrap();
        assert_eq!(dimensions(&png), SCATTER_FIGURE);
    }

    #[test]
    fn scatter_rejects_bad_input() {
        let err = render_cluster_scatter(&[[0.0, 0.0]], &[], &[]).unwrap_err();
        assert!(matches!(err, DatasetError::Render(_)));
        let err = render_cluster_scatter(&[[f64::NAN, 0.0]], &[0], &[]).unwrap_err();
        assert!(matches!(err, DatasetError::Render(_)));
    }

    #[test]
    fn silhouette_analysis_renders_both_panels() {
        let points = [[0.0, 0.0], [0.2, 0.1], [0.1, 0.3], [5.0, 5.0], [6.0, 4.0]];
        let labels = [1, 1, 1, 0, 0];
        let scores = [0.71, 0.64, -0.05, 0.82, 0.77];
        let centers = [[5.5, 4.5], [0.1, 0.13]];
        let png = render_silhouette_analysis(&points, &scores, &labels, 0.58, &centers).unwrap();
        assert_eq!(dimensions(&png), SILHOUETTE_FIGURE);

        let img = image::load_from_memory(&png).unwrap().to_rgb8();
        let colors = ColorMap::new(&[0, 1].into_iter().collect());
        let (left_half, right_half): (Vec<_>, Vec<_>) = img
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == colors.color_for(0))
            .partition(|(x, _, _)| *x < SILHOUETTE_FIGURE.0 / 2);
        assert!(!left_half.is_empty());
        assert!(!right_half.is_empty());
    }

    #[test]
    fn silhouette_analysis_rejects_bad_input() {
        let points = [[0.0, 0.0], [1.0, 1.0]];
        let err = render_silhouette_analysis(&points, &[0.5], &[0, 1], 0.5, &[]).unwrap_err();
        assert!(matches!(err, DatasetError::Render(_)));

        let err = render_silhouette_analysis(&points, &[0.5, 0.4], &[0], 0.5, &[]).unwrap_err();
        assert!(matches!(err, DatasetError::Render(_)));

        let err =
            render_silhouette_analysis(&points, &[0.5, f64::NAN], &[0, 1], 0.5, &[]).unwrap_err();
        assert!(matches!(err, DatasetError::Render(_)));

        let err = render_silhouette_analysis(&points, &[0.5, 0.4], &[0, 1], f64::INFINITY, &[])
            .unwrap_err();
        assert!(matches!(err, DatasetError::Render(_)));

        let err = render_silhouette_analysis(&[], &[], &[], 0.0, &[]).unwrap_err();
        assert!(matches!(err, DatasetError::Render(_)));
    }
}
