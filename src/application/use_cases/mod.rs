pub mod analysis_pipeline;
pub mod chart_selector;
pub mod report_assembler;
pub mod summarizer;
