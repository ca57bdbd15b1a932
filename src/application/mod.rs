pub mod use_cases;

pub use use_cases::analysis_pipeline::{AnalysisOutcome, AnalysisPipeline};
pub use use_cases::chart_selector::ChartSelector;
pub use use_cases::report_assembler::ReportAssembler;
pub use use_cases::summarizer::Summarizer;
