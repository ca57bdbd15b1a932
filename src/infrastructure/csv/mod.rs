// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing and encoding detection

mod csv_parser;
pub mod encoding;

pub use csv_parser::CsvParser;
