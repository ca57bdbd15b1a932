// ============================================================
// SUMMARIZER USE CASE
// ============================================================
// Descriptive statistics, missing counts and Pearson correlation

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::domain::dataset::{Column, ColumnKind, Table};
use crate::domain::statistics::{
    CategoricalSummary, ColumnSummary, CorrelationMatrix, MissingCount, NumericSummary,
    StatisticsBundle, SummaryDetails,
};

/// Computes a statistics bundle from a table; a pure function of its input
#[derive(Debug, Default)]
pub struct Summarizer;

impl Summarizer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, table: &Table) -> StatisticsBundle {
        let summary: Vec<ColumnSummary> = table.columns().iter().map(summarize_column).collect();

        let missing_values = table
            .columns()
            .iter()
            .map(|c| MissingCount {
                column: c.name().to_string(),
                missing: c.missing_count(),
            })
            .collect();

        let correlation = correlation_matrix(&table.inventory().numeric());

        debug!(
            columns = summary.len(),
            correlated = correlation.len(),
            "Summarized table"
        );

        StatisticsBundle {
            row_count: table.row_count(),
            column_count: table.column_count(),
            summary,
            missing_values,
            correlation,
        }
    }
}

fn summarize_column(column: &Column) -> ColumnSummary {
    match column.kind() {
        ColumnKind::Numeric => {
            let values = column.numbers();
            let unique = values
                .iter()
                .map(|v| {
                    // -0.0 and 0.0 are the same value
                    let normalized = if *v == 0.0 { 0.0f64 } else { *v };
                    normalized.to_bits()
                })
                .collect::<HashSet<_>>()
                .len();

            ColumnSummary {
                column: column.name().to_string(),
                count: values.len(),
                unique,
                details: SummaryDetails::Numeric(numeric_summary(&values)),
            }
        }
        ColumnKind::Categorical => {
            let labels = column.labels();
            let counts = value_counts(&labels);
            let top = counts.first();

            ColumnSummary {
                column: column.name().to_string(),
                count: labels.len(),
                unique: counts.len(),
                details: SummaryDetails::Categorical(CategoricalSummary {
                    top: top.map(|(value, _)| value.to_string()),
                    freq: top.map(|(_, freq)| *freq),
                }),
            }
        }
    }
}

fn numeric_summary(values: &[f64]) -> NumericSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    NumericSummary {
        mean: mean(values),
        std: sample_std(values),
        min: sorted.first().copied(),
        p25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        p75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Frequencies in descending order; ties keep first-appearance order
pub fn value_counts<'a>(labels: &[&'a str]) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for label in labels {
        match index.get(label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label, counts.len());
                counts.push((label, 1));
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0);
    Some(var.sqrt())
}

/// Linear-interpolated quantile of already sorted values
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Pearson correlation over rows where both values are present
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let den = (sxx * syy).sqrt();
    if den == 0.0 || !den.is_finite() {
        None
    } else {
        Some((sxy / den).clamp(-1.0, 1.0))
    }
}

/// Pairwise Pearson matrix; empty for fewer than two columns
pub fn correlation_matrix(numeric: &[&Column]) -> CorrelationMatrix {
    if numeric.len() < 2 {
        return CorrelationMatrix::default();
    }

    let cells: Vec<Vec<Option<f64>>> = numeric.iter().map(|c| c.numeric_cells()).collect();
    let n = numeric.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        values[i][i] = pearson(&cells[i], &cells[i]).map(|_| 1.0);
        for j in (i + 1)..n {
            let r = pearson(&cells[i], &cells[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name().to_string()).collect(),
        values,
    }
}
