// ============================================================
// CSV PARSER
// ============================================================
// Load delimited files into a Table with encoding detection

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::Encoding;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use super::encoding::{self, EncodingSource};
use crate::domain::dataset::Table;
use crate::domain::error::{AppError, Result};

/// CSV loader with encoding and delimiter detection
pub struct CsvParser {
    /// Delimiter character; detected from the content when `None`
    delimiter: Option<u8>,

    /// Explicit encoding label; skips detection when set
    encoding: Option<String>,

    /// Encoding used when detection does not find UTF-8
    fallback_encoding: &'static Encoding,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: None,
            fallback_encoding: encoding::default_fallback(),
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Decode with this encoding label instead of detecting one
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Encoding to fall back to when the sample is not UTF-8
    pub fn with_fallback_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.fallback_encoding = encoding;
        self
    }

    /// Parse a CSV file into a table
    pub fn parse_file(&self, path: &Path) -> Result<Table> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::LoadError(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let table = self.parse_bytes(&bytes)?;
        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "Loaded dataset"
        );
        Ok(table)
    }

    /// Decode raw bytes and parse them
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let detected = match &self.encoding {
            Some(label) => encoding::explicit(bytes, encoding::resolve_label(label)?),
            None => encoding::detect(bytes, self.fallback_encoding),
        };

        debug!(
            encoding = detected.encoding.name(),
            detected = detected.source != EncodingSource::Explicit,
            "Decoding input"
        );

        let content = encoding::decode(bytes, &detected)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<Table> {
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| Self::detect_delimiter(content));

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::All)
            .flexible(true) // Short rows are padded, long rows rejected below
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::LoadError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AppError::LoadError(
                "No columns to parse from file".to_string(),
            ));
        }

        let headers = Self::unique_headers(&headers);

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::LoadError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.len() > headers.len() {
                return Err(AppError::LoadError(format!(
                    "CSV row {} has {} fields, header has {}",
                    index + 1,
                    record.len(),
                    headers.len()
                )));
            }

            records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        Table::from_records(&headers, &records)
    }

    /// Make header names unique: blanks become `Unnamed: i`, repeats get `.n` suffixes
    fn unique_headers(headers: &StringRecord) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(headers.len());

        for (idx, header) in headers.iter().enumerate() {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                header.trim().to_string()
            };

            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            names.push(name);
        }

        names
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(10)
            .collect();

        if sample_lines.is_empty() {
            return b',';
        }

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::ColumnKind;

    #[test]
    fn test_parse_simple_csv() {
        let content = "name,age,city\nAlice,30,NYC\nBob,25,LA";
        let table = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.columns()[0].name(), "name");
        assert_eq!(table.column("age").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(table.column("city").unwrap().labels(), vec!["NYC", "LA"]);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvParser::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(CsvParser::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(CsvParser::detect_delimiter("a\tb\nc\td"), b'\t');
        assert_eq!(CsvParser::detect_delimiter(""), b',');
    }

    #[test]
    fn test_semicolon_file_is_parsed() {
        let table = CsvParser::new()
            .parse_content("x;y\n1;2\n3;4\n")
            .unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("y").unwrap().numbers(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_latin1_bytes_are_decoded() {
        let bytes = b"name,city\nJos\xe9,S\xe3o Paulo\n";
        let table = CsvParser::new().parse_bytes(bytes).unwrap();
        assert_eq!(table.column("name").unwrap().labels(), vec!["José"]);
        assert_eq!(table.column("city").unwrap().labels(), vec!["São Paulo"]);
    }

    #[test]
    fn test_utf8_bom_is_stripped_from_first_header() {
        let bytes = b"\xef\xbb\xbfid,v\n1,2\n";
        let table = CsvParser::new().parse_bytes(bytes).unwrap();
        assert!(table.column("id").is_some());
    }

    #[test]
    fn test_unknown_encoding_label_fails() {
        let result = CsvParser::new().with_encoding("klingon").parse_bytes(b"a\n1\n");
        assert!(matches!(result, Err(AppError::LoadError(_))));
    }

    #[test]
    fn test_binary_file_fails() {
        let result = CsvParser::new().parse_bytes(b"a,b\n\x00\x01\x02,\x9d\n");
        assert!(matches!(result, Err(AppError::LoadError(_))));
    }

    #[test]
    fn test_empty_content_fails() {
        let result = CsvParser::new().parse_content("");
        assert!(matches!(result, Err(AppError::LoadError(_))));
    }

    #[test]
    fn test_long_row_fails_short_row_is_padded() {
        let long = CsvParser::new().parse_content("a,b\n1,2,3\n");
        assert!(matches!(long, Err(AppError::LoadError(_))));

        let short = CsvParser::new().parse_content("a,b\n1,2\n3\n").unwrap();
        assert_eq!(short.row_count(), 2);
        assert_eq!(short.column("b").unwrap().missing_count(), 1);
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let table = CsvParser::new().parse_content("x,x,,x\n1,2,3,4\n").unwrap();
        let names: Vec<&str> = table.columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["x", "x.1", "Unnamed: 2", "x.2"]);
    }

    #[test]
    fn test_missing_file_fails() {
        let path = std::env::temp_dir().join("autolysis-does-not-exist.csv");
        let result = CsvParser::new().parse_file(&path);
        assert!(matches!(result, Err(AppError::LoadError(_))));
    }
}
