// ============================================================
// CHART SELECTOR USE CASE
// ============================================================
// Decide which charts a table gets, prepare their data and
// hand them to a renderer

use std::path::Path;
use tracing::{info, warn};

use super::summarizer::{correlation_matrix, value_counts};
use crate::domain::chart::{ChartArtifact, ChartData, ChartKind, ChartPlan};
use crate::domain::dataset::{Column, Table};
use crate::infrastructure::charts::ChartRenderer;

/// Upper bound on charts per run
pub const MAX_CHARTS: usize = 3;

pub const DEFAULT_TOP_CATEGORIES: usize = 10;

/// Deterministic chart selection
#[derive(Debug, Clone)]
pub struct ChartSelector {
    top_categories: usize,
}

impl ChartSelector {
    pub fn new(top_categories: usize) -> Self {
        Self {
            top_categories: top_categories.max(1),
        }
    }

    /// Apply the rules in order: distribution, category bar, correlation heatmap.
    /// Columns without any usable value are skipped.
    pub fn select(&self, table: &Table) -> Vec<ChartPlan> {
        let inventory = table.inventory();
        let numeric: Vec<&Column> = inventory
            .numeric()
            .into_iter()
            .filter(|c| c.present_count() > 0)
            .collect();
        let categorical: Vec<&Column> = inventory
            .categorical()
            .into_iter()
            .filter(|c| c.present_count() > 0)
            .collect();

        let mut plans = Vec::with_capacity(MAX_CHARTS);

        if let Some(first) = numeric.first() {
            plans.push(ChartPlan::new(
                ChartKind::Distribution,
                vec![first.name().to_string()],
            ));
        }

        if let Some(first) = categorical.first() {
            plans.push(ChartPlan::new(
                ChartKind::CategoryBar,
                vec![first.name().to_string()],
            ));
        }

        if numeric.len() >= 2 {
            plans.push(ChartPlan::new(
                ChartKind::CorrelationHeatmap,
                numeric.iter().map(|c| c.name().to_string()).collect(),
            ));
        }

        plans.truncate(MAX_CHARTS);
        plans
    }

    /// Gather the numbers a plan depicts; `None` when its columns have no data
    pub fn prepare(&self, plan: &ChartPlan, table: &Table) -> Option<ChartData> {
        let columns: Vec<&Column> = plan
            .columns
            .iter()
            .filter_map(|name| table.column(name))
            .collect();

        match plan.kind {
            ChartKind::Distribution => {
                let column = columns.first()?;
                let values = column.numbers();
                (!values.is_empty()).then(|| ChartData::Distribution {
                    column: column.name().to_string(),
                    values,
                })
            }
            ChartKind::CategoryBar => {
                let column = columns.first()?;
                let labels = column.labels();
                let all = value_counts(&labels);
                let distinct = all.len();
                let counts: Vec<(String, usize)> = all
                    .into_iter()
                    .take(self.top_categories)
                    .map(|(label, count)| (label.to_string(), count))
                    .collect();
                (!counts.is_empty()).then(|| ChartData::CategoryBar {
                    column: column.name().to_string(),
                    counts,
                    distinct,
                })
            }
            ChartKind::CorrelationHeatmap => {
                let matrix = correlation_matrix(&columns);
                (!matrix.is_empty()).then_some(ChartData::CorrelationHeatmap { matrix })
            }
        }
    }

    /// Select, prepare and render charts into `output_dir`.
    ///
    /// A chart that fails to render is skipped; the others are still produced.
    pub fn generate(
        &self,
        table: &Table,
        renderer: &dyn ChartRenderer,
        output_dir: &Path,
        base_name: &str,
    ) -> Vec<ChartArtifact> {
        let mut artifacts = Vec::new();

        for plan in self.select(table) {
            let Some(data) = self.prepare(&plan, table) else {
                warn!(kind = %plan.kind, columns = ?plan.columns, "No data for chart, skipping");
                continue;
            };

            let file_name = plan.file_name(base_name);
            let path = output_dir.join(&file_name);
            let title = plan.title();

            match renderer.render(&title, &data, &path) {
                Ok(()) => {
                    info!(file = %file_name, kind = %plan.kind, "Chart generated");
                    artifacts.push(ChartArtifact {
                        kind: plan.kind,
                        columns: plan.columns,
                        title,
                        file_name,
                        path,
                    });
                }
                Err(err) => warn!(error = %err, kind = %plan.kind, "Chart skipped"),
            }
        }

        artifacts
    }
}

impl Default for ChartSelector {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_CATEGORIES)
    }
}
