use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::domain::error::{AppError, Result};

/// Analyze a CSV file: summary statistics, up to three charts and a README narrative.
#[derive(Parser, Debug)]
#[command(name = "autolysis", version, about, long_about = None)]
pub struct Cli {
    /// CSV file to analyze (asked for on stdin when omitted)
    pub file_path: Option<PathBuf>,

    /// Directory for the README and chart images [default: output]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Input encoding label (e.g. utf-8, latin1); skips detection
    #[arg(long)]
    pub encoding: Option<String>,

    /// Field delimiter: a single ASCII character or "tab"; auto-detected otherwise
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Treat COLUMN as numeric even if some cells are text (repeatable)
    #[arg(long = "numeric", value_name = "COLUMN")]
    pub numeric: Vec<String>,

    /// Config file [default: autolysis.toml when present]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        self.delimiter.as_deref().map(parse_delimiter).transpose()
    }
}

fn parse_delimiter(raw: &str) -> Result<u8> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() && !c.is_ascii_alphanumeric() && c != '"' => {
                    Ok(c as u8)
                }
                _ => Err(AppError::ConfigError(format!(
                    "Invalid delimiter '{}': expected one ASCII punctuation character or \"tab\"",
                    raw
                ))),
            }
        }
    }
}

/// Ask for the CSV path interactively.
pub fn prompt_for_path<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<PathBuf> {
    write!(output, "Enter the path to the CSV file: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let path = line.trim().trim_matches('"');
    if path.is_empty() {
        return Err(AppError::LoadError("No CSV file path provided".to_string()));
    }
    Ok(PathBuf::from(path))
}
