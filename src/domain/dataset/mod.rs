// ============================================================
// DATASET DOMAIN LAYER
// ============================================================
// Core table types: cells, columns, classification
// No I/O, no async, no external dependencies

mod cell;
mod column;
mod table;

pub use cell::{Cell, MISSING_TOKENS};
pub use column::{Column, ColumnKind};
pub use table::{ColumnInventory, Table};
