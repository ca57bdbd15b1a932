// ============================================================
// TABLE
// ============================================================
// The loaded dataset and its column type inventory

use crate::domain::error::{AppError, Result};

use super::column::{Column, ColumnKind};

/// Rows x named columns; every column has the same length
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Create a table, checking that all columns share one row count
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);

        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(AppError::LoadError(format!(
                "Column '{}' has {} rows, expected {}",
                bad.name(),
                bad.len(),
                row_count
            )));
        }

        Ok(Self { columns, row_count })
    }

    /// Build a table from a header row and raw records (short records are padded)
    pub fn from_records<S: AsRef<str>>(headers: &[S], records: &[Vec<String>]) -> Result<Self> {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let raw: Vec<&str> = records
                    .iter()
                    .map(|record| record.get(idx).map(String::as_str).unwrap_or(""))
                    .collect();
                Column::from_raw(header.as_ref(), &raw)
            })
            .collect();

        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Force a column to be treated as numeric. Returns false if it does not exist.
    pub fn declare_numeric(&mut self, name: &str) -> bool {
        match self.columns.iter_mut().find(|c| c.name() == name) {
            Some(column) => {
                column.declare_numeric();
                true
            }
            None => false,
        }
    }

    /// Derive the numeric/categorical inventory.
    ///
    /// The inventory borrows the table, so it cannot outlive a mutation.
    pub fn inventory(&self) -> ColumnInventory<'_> {
        ColumnInventory {
            entries: self.columns.iter().map(|c| (c, c.kind())).collect(),
        }
    }
}

/// Derived view classifying each column of a table
#[derive(Debug)]
pub struct ColumnInventory<'a> {
    entries: Vec<(&'a Column, ColumnKind)>,
}

impl<'a> ColumnInventory<'a> {
    /// Numeric columns in table order
    pub fn numeric(&self) -> Vec<&'a Column> {
        self.of_kind(ColumnKind::Numeric)
    }

    /// Categorical columns in table order
    pub fn categorical(&self) -> Vec<&'a Column> {
        self.of_kind(ColumnKind::Categorical)
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.entries
            .iter()
            .find(|(c, _)| c.name() == name)
            .map(|(_, kind)| *kind)
    }

    fn of_kind(&self, kind: ColumnKind) -> Vec<&'a Column> {
        self.entries
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|(c, _)| *c)
            .collect()
    }
}
