use plotters::coord::Shift;
use plotters::prelude::*;

use super::{draw_err, palette};
use crate::application::use_cases::summarizer::{mean, quantile, sample_std};
use crate::domain::error::{AppError, Result};

const MAX_BINS: usize = 100;
const DENSITY_POINTS: usize = 200;

/// One histogram bucket, `[lo, hi)` except the last which is closed
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Number of bins: the larger of the Sturges and Freedman-Diaconis estimates
pub fn auto_bin_count(values: &[f64]) -> usize {
    let n = values.len();
    if n < 2 {
        return 1;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let range = sorted[n - 1] - sorted[0];
    if range <= 0.0 {
        return 1;
    }

    let sturges_width = range / ((n as f64).log2() + 1.0);
    let iqr = quantile(&sorted, 0.75).unwrap_or(0.0) - quantile(&sorted, 0.25).unwrap_or(0.0);
    let fd_width = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);

    let width = if fd_width > 0.0 {
        fd_width.min(sturges_width)
    } else {
        sturges_width
    };

    ((range / width).ceil() as usize).clamp(1, MAX_BINS)
}

/// Bucket values into equal-width bins over their range
pub fn bin_values(values: &[f64]) -> Vec<Bin> {
    let Some((lo, hi)) = padded_range(values) else {
        return Vec::new();
    };
    let bins = auto_bin_count(values);
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Gaussian KDE (Scott's rule) evaluated over the data range, scaled to counts
pub fn density_curve(values: &[f64], bin_width: f64) -> Vec<(f64, f64)> {
    let n = values.len();
    let Some(std) = sample_std(values) else {
        return Vec::new();
    };
    if std <= 0.0 {
        return Vec::new();
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let Some((lo, hi)) = padded_range(values) else {
        return Vec::new();
    };
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n as f64 * bin_width;

    (0..DENSITY_POINTS)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / (DENSITY_POINTS - 1) as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect()
}

/// Plot range of the values; `None` when empty or when the span overflows f64
fn padded_range(values: &[f64]) -> Option<(f64, f64)> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (lo, hi) = if hi > lo {
        (lo, hi)
    } else {
        let pad = (lo.abs() * 0.05).max(0.5);
        (lo - pad, hi + pad)
    };

    (lo.is_finite() && hi.is_finite() && (hi - lo).is_finite() && hi > lo).then_some((lo, hi))
}

pub fn draw_distribution<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    column: &str,
    values: &[f64],
) -> Result<()> {
    let (lo, hi) = padded_range(values).ok_or_else(|| {
        AppError::RenderError(format!("Value range of '{}' cannot be plotted", column))
    })?;

    let bins = bin_values(values);
    let bin_width = bins.first().map(|b| b.hi - b.lo).unwrap_or(1.0);
    let curve = density_curve(values, bin_width);
    let mean_value = mean(values).filter(|m| m.is_finite());

    let top = bins
        .iter()
        .map(|b| b.count as f64)
        .chain(curve.iter().map(|p| p.1))
        .fold(1.0, f64::max)
        * 1.1;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..top)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc(column)
        .y_desc("Count")
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new(
                [(b.lo, 0.0), (b.hi, b.count as f64)],
                palette::HIST.mix(0.6).filled(),
            )
        }))
        .map_err(draw_err)?;

    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new(
                [(b.lo, 0.0), (b.hi, b.count as f64)],
                WHITE.stroke_width(1),
            )
        }))
        .map_err(draw_err)?;

    if !curve.is_empty() {
        chart
            .draw_series(LineSeries::new(curve, palette::DENSITY.stroke_width(2)))
            .map_err(draw_err)?
            .label("density")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], palette::DENSITY.stroke_width(2))
            });
    }

    if let Some(m) = mean_value {
        chart
            .draw_series(LineSeries::new(vec![(m, 0.0), (m, top)], RED.stroke_width(2)))
            .map_err(draw_err)?
            .label(format!("mean = {:.2}", m))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;

    Ok(())
}
