// ============================================================
// ANALYSIS PIPELINE USE CASE
// ============================================================
// Load -> summarize -> chart -> narrate, strictly in that order

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use super::chart_selector::ChartSelector;
use super::report_assembler::ReportAssembler;
use super::summarizer::Summarizer;
use crate::domain::chart::ChartArtifact;
use crate::domain::error::Result;
use crate::domain::report::NarrativeDocument;
use crate::domain::statistics::StatisticsBundle;
use crate::infrastructure::charts::ChartRenderer;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::storage;

/// Everything one run produced
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub base_name: String,
    pub output_dir: PathBuf,
    pub statistics: StatisticsBundle,
    pub artifacts: Vec<ChartArtifact>,
    pub document: NarrativeDocument,
}

pub struct AnalysisPipeline {
    parser: CsvParser,
    summarizer: Summarizer,
    selector: ChartSelector,
    renderer: Box<dyn ChartRenderer>,
    assembler: ReportAssembler,
    numeric_columns: Vec<String>,
}

impl AnalysisPipeline {
    pub fn new(
        parser: CsvParser,
        selector: ChartSelector,
        renderer: Box<dyn ChartRenderer>,
        assembler: ReportAssembler,
    ) -> Self {
        Self {
            parser,
            summarizer: Summarizer::new(),
            selector,
            renderer,
            assembler,
            numeric_columns: Vec::new(),
        }
    }

    /// Columns to treat as numeric regardless of stray text cells
    pub fn with_numeric_columns(mut self, columns: Vec<String>) -> Self {
        self.numeric_columns = columns;
        self
    }

    /// Run the whole analysis for `input`, writing artifacts into `output_dir`.
    ///
    /// A load failure returns before anything touches the output directory.
    /// Chart and narrative failures degrade the output instead of failing the run.
    pub async fn run(&self, input: &Path, output_dir: &Path) -> Result<AnalysisOutcome> {
        let started = Instant::now();
        let base_name = storage::base_name(input);
        info!("Analyzing {} (base name '{}')", input.display(), base_name);

        let mut table = self.parser.parse_file(input)?;
        for name in &self.numeric_columns {
            if !table.declare_numeric(name) {
                warn!("Column '{}' not found, numeric declaration ignored", name);
            }
        }

        let output_dir = storage::ensure_output_dir(output_dir)?;

        let statistics = self.summarizer.summarize(&table);
        info!(
            rows = statistics.row_count,
            columns = statistics.column_count,
            "Summary statistics computed"
        );

        let artifacts =
            self.selector
                .generate(&table, self.renderer.as_ref(), &output_dir, &base_name);
        if artifacts.is_empty() {
            warn!("No charts were produced");
        }

        let document = self
            .assembler
            .assemble(&base_name, &statistics, &artifacts, &output_dir)
            .await?;

        info!(
            charts = artifacts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis complete"
        );

        Ok(AnalysisOutcome {
            base_name,
            output_dir,
            statistics,
            artifacts,
            document,
        })
    }
}
