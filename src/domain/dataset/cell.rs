// ============================================================
// CELL VALUES
// ============================================================
// Typed cell values produced by the loader

/// Spellings treated as a missing value, in addition to blank cells.
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single typed cell of a table
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Parse a raw field into a typed cell
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if Self::is_missing_token(trimmed) {
            return Cell::Missing;
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Cell::Number(value),
            // Infinities and NaN spellings are numbers with no usable value
            Ok(_) => Cell::Missing,
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    /// Whether a trimmed raw value spells a missing cell
    pub fn is_missing_token(trimmed: &str) -> bool {
        trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// Parse a numeric literal; only finite values count as numbers
pub fn parse_number(trimmed: &str) -> Option<f64> {
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers_and_text() {
        assert_eq!(Cell::parse("42"), Cell::Number(42.0));
        assert_eq!(Cell::parse(" -3.5 "), Cell::Number(-3.5));
        assert_eq!(Cell::parse("1e3"), Cell::Number(1000.0));
        assert_eq!(Cell::parse("Paris"), Cell::Text("Paris".to_string()));
    }

    #[test]
    fn test_missing_tokens() {
        for raw in ["", "   ", "NA", "N/A", "null", "NaN", "nan", "None", "#N/A"] {
            assert!(Cell::parse(raw).is_missing(), "{raw:?} should be missing");
        }
    }

    #[test]
    fn test_non_finite_numbers_are_missing() {
        for raw in ["inf", "-inf", "+inf", "Infinity", "-Infinity", "NAN", "1e999"] {
            assert!(Cell::parse(raw).is_missing(), "{raw:?} should be missing");
        }
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("2.5"), Some(2.5));
    }
}
