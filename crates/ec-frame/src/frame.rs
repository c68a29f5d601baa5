//! The frame type and its split-orientation JSON codec.

use crate::{FrameError, FrameResult};
use serde::{Deserialize, Serialize};

/// A single table cell. Kept as loose JSON: the service mixes numbers,
/// strings and nulls in the same table (e.g. parameter columns next to
/// impact columns in a result dump).
pub type Cell = serde_json::Value;

/// Column-oriented table matching the service's "split" JSON layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    index: Vec<Cell>,
    rows: Vec<Vec<Cell>>,
}

/// Serde form of the split layout: `{"columns": [...], "index": [...],
/// "data": [[...], ...]}`.
#[derive(Debug, Serialize, Deserialize)]
struct SplitRepr {
    columns: Vec<String>,
    index: Vec<Cell>,
    data: Vec<Vec<Cell>>,
}

impl Frame {
    /// Build a frame from parts, validating the shape.
    pub fn new(
        columns: Vec<String>,
        index: Vec<Cell>,
        rows: Vec<Vec<Cell>>,
    ) -> FrameResult<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(FrameError::RaggedRow {
                    row: i,
                    len: row.len(),
                    expected: columns.len(),
                });
            }
        }
        if index.len() != rows.len() {
            return Err(FrameError::IndexMismatch {
                index_len: index.len(),
                rows: rows.len(),
            });
        }
        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Decode a split-orientation JSON document.
    pub fn from_json_str(s: &str) -> FrameResult<Self> {
        let repr: SplitRepr = serde_json::from_str(s)?;
        Self::new(repr.columns, repr.index, repr.data)
    }

    /// Decode a response body that is a JSON *string* wrapping a split
    /// document. The service double-encodes tabular replies this way.
    pub fn from_enveloped_json(body: &str) -> FrameResult<Self> {
        let inner: String = serde_json::from_str(body)?;
        Self::from_json_str(&inner)
    }

    /// Encode as a split-orientation JSON document.
    pub fn to_json_string(&self) -> FrameResult<String> {
        let repr = SplitRepr {
            columns: self.columns.clone(),
            index: self.index.clone(),
            data: self.rows.clone(),
        };
        Ok(serde_json::to_string(&repr)?)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index(&self) -> &[Cell] {
        &self.index
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, i: usize) -> Option<&[Cell]> {
        self.rows.get(i).map(|r| r.as_slice())
    }

    fn column_position(&self, name: &str) -> FrameResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| FrameError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Cells of one column, in row order.
    pub fn column(&self, name: &str) -> FrameResult<Vec<&Cell>> {
        let pos = self.column_position(name)?;
        Ok(self.rows.iter().map(|r| &r[pos]).collect())
    }

    /// One column as f64 values. Integer cells are widened; anything else
    /// is an error naming the offending row.
    pub fn numeric_column(&self, name: &str) -> FrameResult<Vec<f64>> {
        let pos = self.column_position(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                r[pos].as_f64().ok_or(FrameError::NonNumeric {
                    column: name.to_string(),
                    row: i,
                })
            })
            .collect()
    }
}
