// ============================================================
// STATISTICS BUNDLE
// ============================================================
// Descriptive statistics of a table: per-column summary,
// missing-value counts and the numeric correlation matrix

use serde::Serialize;

use super::dataset::ColumnKind;

/// Statistics for numeric columns; `None` where undefined (serialised as null)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub median: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Statistics for categorical columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub top: Option<String>,
    pub freq: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SummaryDetails {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Summary of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    #[serde(flatten)]
    pub details: SummaryDetails,
}

impl ColumnSummary {
    pub fn kind(&self) -> ColumnKind {
        match self.details {
            SummaryDetails::Numeric(_) => ColumnKind::Numeric,
            SummaryDetails::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn numeric(&self) -> Option<&NumericSummary> {
        match &self.details {
            SummaryDetails::Numeric(summary) => Some(summary),
            SummaryDetails::Categorical(_) => None,
        }
    }

    pub fn categorical(&self) -> Option<&CategoricalSummary> {
        match &self.details {
            SummaryDetails::Categorical(summary) => Some(summary),
            SummaryDetails::Numeric(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Square Pearson matrix over numeric columns; empty below two numeric columns
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        self.values[i][j]
    }
}

/// Everything the summarizer computes for one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsBundle {
    pub row_count: usize,
    pub column_count: usize,
    pub summary: Vec<ColumnSummary>,
    pub missing_values: Vec<MissingCount>,
    pub correlation: CorrelationMatrix,
}

impl StatisticsBundle {
    pub fn summary_for(&self, column: &str) -> Option<&ColumnSummary> {
        self.summary.iter().find(|s| s.column == column)
    }

    pub fn missing_for(&self, column: &str) -> Option<usize> {
        self.missing_values
            .iter()
            .find(|m| m.column == column)
            .map(|m| m.missing)
    }

    /// Deterministic JSON rendering, column order preserved
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
