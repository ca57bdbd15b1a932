// ============================================================
// COLUMN
// ============================================================
// A named column and its derived classification

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell::{parse_number, Cell};

/// Classification used to pick statistics and chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// A named, ordered sequence of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
    declared_numeric: bool,
}

impl Column {
    /// Build a column from already typed cells
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
            declared_numeric: false,
        }
    }

    /// Build a column from raw field values.
    ///
    /// A single non-numeric value turns the whole column textual, so the
    /// numeric-looking values keep their original spelling ("007" stays "007").
    pub fn from_raw<S: AsRef<str>>(name: impl Into<String>, raw: &[S]) -> Self {
        let parsed: Vec<Cell> = raw.iter().map(|v| Cell::parse(v.as_ref())).collect();
        let has_text = parsed.iter().any(|c| matches!(c, Cell::Text(_)));

        let cells = if has_text {
            raw.iter()
                .zip(parsed)
                .map(|(value, cell)| match cell {
                    Cell::Missing => Cell::Missing,
                    _ => Cell::Text(value.as_ref().trim().to_string()),
                })
                .collect()
        } else {
            parsed
        };

        Self::new(name, cells)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Force numeric treatment; unparseable text cells then count as missing
    pub(crate) fn declare_numeric(&mut self) {
        self.declared_numeric = true;
    }

    /// Derived classification, recomputed from the cells on every call
    pub fn kind(&self) -> ColumnKind {
        if self.declared_numeric || !self.cells.iter().any(|c| matches!(c, Cell::Text(_))) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    /// Per-row numeric view; `None` for anything not usable as a number
    pub fn numeric_cells(&self) -> Vec<Option<f64>> {
        self.cells.iter().map(|c| self.cell_number(c)).collect()
    }

    /// Present numeric values in row order
    pub fn numbers(&self) -> Vec<f64> {
        self.cells.iter().filter_map(|c| self.cell_number(c)).collect()
    }

    /// Present textual values in row order
    pub fn labels(&self) -> Vec<&str> {
        self.cells.iter().filter_map(Cell::as_text).collect()
    }

    /// Cells the statistics can use, given the column's kind
    pub fn present_count(&self) -> usize {
        match self.kind() {
            ColumnKind::Numeric => self.numbers().len(),
            ColumnKind::Categorical => self.cells.iter().filter(|c| !c.is_missing()).count(),
        }
    }

    pub fn missing_count(&self) -> usize {
        self.len() - self.present_count()
    }

    fn cell_number(&self, cell: &Cell) -> Option<f64> {
        match cell {
            Cell::Number(value) => Some(*value),
            Cell::Text(raw) if self.declared_numeric => parse_number(raw.trim()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_column_from_raw() {
        let column = Column::from_raw("age", &["31", "", "45", "NA"]);
        assert_eq!(column.kind(), ColumnKind::Numeric);
        assert_eq!(column.numbers(), vec![31.0, 45.0]);
        assert_eq!(column.missing_count(), 2);
    }

    #[test]
    fn test_infinite_cells_keep_column_numeric() {
        let column = Column::from_raw("ratio", &["1.5", "inf", "-Infinity", "3"]);
        assert_eq!(column.kind(), ColumnKind::Numeric);
        assert_eq!(column.numbers(), vec![1.5, 3.0]);
        assert_eq!(column.missing_count(), 2);
    }

    #[test]
    fn test_mixed_column_keeps_original_spelling() {
        let column = Column::from_raw("code", &["007", "abc", ""]);
        assert_eq!(column.kind(), ColumnKind::Categorical);
        assert_eq!(column.labels(), vec!["007", "abc"]);
        assert_eq!(column.present_count() + column.missing_count(), 3);
    }

    #[test]
    fn test_all_missing_column_is_numeric() {
        let column = Column::from_raw("empty", &["", "NA"]);
        assert_eq!(column.kind(), ColumnKind::Numeric);
        assert!(column.numbers().is_empty());
        assert_eq!(column.missing_count(), 2);
    }

    #[test]
    fn test_declared_numeric_treats_text_as_missing() {
        let mut column = Column::from_raw("price", &["10", "n/a?", "12.5"]);
        assert_eq!(column.kind(), ColumnKind::Categorical);

        column.declare_numeric();
        assert_eq!(column.kind(), ColumnKind::Numeric);
        assert_eq!(column.numeric_cells(), vec![Some(10.0), None, Some(12.5)]);
        assert_eq!(column.missing_count(), 1);
    }
}
