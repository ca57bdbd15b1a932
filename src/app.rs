use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::use_cases::analysis_pipeline::{AnalysisOutcome, AnalysisPipeline};
use crate::application::use_cases::chart_selector::ChartSelector;
use crate::application::use_cases::report_assembler::ReportAssembler;
use crate::domain::error::Result;
use crate::domain::report::NarrativeSource;
use crate::infrastructure::charts::PlottersRenderer;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::llm_clients::OpenAIClient;
use crate::interfaces::cli::{self, Cli};

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_logging(&cli.log_level);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(cli)) {
        Ok(outcome) => {
            print_outcome(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout only carries the run summary.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn execute(cli: Cli) -> Result<AnalysisOutcome> {
    let config = AppConfig::load(cli.config.as_deref())?;

    // Fail before touching any input when the token is absent
    let api_key = config.read_credential()?;

    let file_path = match cli.file_path.clone() {
        Some(path) => path,
        None => {
            let stdin = std::io::stdin();
            cli::prompt_for_path(stdin.lock(), std::io::stdout())?
        }
    };
    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());

    let mut parser = CsvParser::new().with_fallback_encoding(config.fallback_encoding()?);
    if let Some(label) = cli.encoding.clone() {
        parser = parser.with_encoding(label);
    }
    if let Some(delimiter) = cli.delimiter_byte()? {
        parser = parser.with_delimiter(delimiter);
    }

    let client = Arc::new(OpenAIClient::new(config.timeout_secs)?);
    let assembler = ReportAssembler::new(client, config.llm_config(api_key))
        .with_max_prompt_tokens(config.max_prompt_tokens);

    let pipeline = AnalysisPipeline::new(
        parser,
        ChartSelector::new(config.top_categories),
        Box::new(PlottersRenderer::new(config.image_size)),
        assembler,
    )
    .with_numeric_columns(cli.numeric.clone());

    info!("Writing results to {}", output_dir.display());
    pipeline.run(&file_path, &output_dir).await
}

fn print_outcome(outcome: &AnalysisOutcome) {
    println!("README: {}", outcome.document.path.display());
    for artifact in &outcome.artifacts {
        println!("Chart:  {}", artifact.path.display());
    }
    if outcome.document.source == NarrativeSource::FailureNotice {
        println!("Note: narrative unavailable, failure notice written instead");
    }
}
