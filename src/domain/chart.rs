use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::statistics::CorrelationMatrix;

/// The three chart types the selector can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Histogram with density curve and mean marker for one numeric column
    Distribution,
    /// Top-N frequency bars for one categorical column
    CategoryBar,
    /// Annotated Pearson heatmap across all numeric columns
    CorrelationHeatmap,
}

impl ChartKind {
    fn file_suffix(&self) -> &'static str {
        match self {
            ChartKind::Distribution => "distribution",
            ChartKind::CategoryBar => "bar",
            ChartKind::CorrelationHeatmap => "correlation_heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Distribution => write!(f, "distribution"),
            ChartKind::CategoryBar => write!(f, "category bar"),
            ChartKind::CorrelationHeatmap => write!(f, "correlation heatmap"),
        }
    }
}

/// A selected chart, before anything is rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPlan {
    pub kind: ChartKind,
    pub columns: Vec<String>,
}

impl ChartPlan {
    pub fn new(kind: ChartKind, columns: Vec<String>) -> Self {
        Self { kind, columns }
    }

    /// `{base}_{column}_{kind}.png`, or `{base}_{kind}.png` for multi-column charts
    pub fn file_name(&self, base_name: &str) -> String {
        let base = sanitize_file_component(base_name);
        match self.kind {
            ChartKind::CorrelationHeatmap => format!("{}_{}.png", base, self.kind.file_suffix()),
            _ => {
                let column = self
                    .columns
                    .first()
                    .map(|c| sanitize_file_component(c))
                    .unwrap_or_default();
                format!("{}_{}_{}.png", base, column, self.kind.file_suffix())
            }
        }
    }

    pub fn title(&self) -> String {
        match self.kind {
            ChartKind::Distribution => format!("Distribution of {}", self.columns.join(", ")),
            ChartKind::CategoryBar => format!("Top values of {}", self.columns.join(", ")),
            ChartKind::CorrelationHeatmap => "Correlation Heatmap".to_string(),
        }
    }
}

/// The numbers a chart depicts, prepared from the table
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Distribution {
        column: String,
        values: Vec<f64>,
    },
    CategoryBar {
        column: String,
        /// Top values by descending frequency
        counts: Vec<(String, usize)>,
        /// Distinct values in the column, including the omitted ones
        distinct: usize,
    },
    CorrelationHeatmap {
        matrix: CorrelationMatrix,
    },
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Distribution { .. } => ChartKind::Distribution,
            ChartData::CategoryBar { .. } => ChartKind::CategoryBar,
            ChartData::CorrelationHeatmap { .. } => ChartKind::CorrelationHeatmap,
        }
    }
}

/// A rendered chart image on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    pub columns: Vec<String>,
    pub title: String,
    pub file_name: String,
    pub path: PathBuf,
}

/// Replace characters that are unsafe in file names; keep case
pub fn sanitize_file_component(name: &str) -> String {
    let cleaned = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_').to_string();
    if cleaned.is_empty() {
        "column".to_string()
    } else {
        cleaned
    }
}
