//! ec-frame: column-oriented tables in the service's "split" JSON layout.
//!
//! The evaluation service returns tabular data (result database dumps, energy
//! series) as a JSON document with separate `columns`, `index` and `data`
//! arrays. [`Frame`] is the in-memory form of that layout, with CSV
//! import/export for the CLI and for steady-state weather uploads.

pub mod csv;
pub mod frame;

pub use frame::{Cell, Frame};

pub type FrameResult<T> = Result<T, FrameError>;

#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("Row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Index has {index_len} labels for {rows} rows")]
    IndexMismatch { index_len: usize, rows: usize },

    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("Non-numeric cell in column '{column}' at row {row}")]
    NonNumeric { column: String, row: usize },

    #[error("Empty CSV input")]
    EmptyCsv,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
