//! Plain CSV import/export for frames.
//!
//! Deliberately simple: comma-separated, one header row, index labels in the
//! first column. Cells containing commas or newlines are not supported; the
//! service's tables are numeric apart from their labels.

use crate::{Frame, FrameError, FrameResult};
use serde_json::Value;

fn cell_to_csv(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_to_cell(field: &str) -> Value {
    let field = field.trim();
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = field.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = field.parse::<f64>() {
        return Value::from(f);
    }
    Value::from(field)
}

/// Render a frame as CSV with the index in the first column.
pub fn to_csv(frame: &Frame) -> String {
    let mut out = String::from("index");
    for col in frame.columns() {
        out.push(',');
        out.push_str(col);
    }
    out.push('\n');

    for (label, i) in frame.index().iter().zip(0..) {
        out.push_str(&cell_to_csv(label));
        if let Some(row) = frame.row(i) {
            for cell in row {
                out.push(',');
                out.push_str(&cell_to_csv(cell));
            }
        }
        out.push('\n');
    }
    out
}

/// Parse CSV produced by [`to_csv`] (or equivalent): header row first,
/// index labels in the first column. Numeric fields become numbers,
/// empty fields become nulls, everything else stays a string.
pub fn from_csv(content: &str) -> FrameResult<Frame> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next().ok_or(FrameError::EmptyCsv)?;

    let columns: Vec<String> = header
        .split(',')
        .skip(1)
        .map(|c| c.trim().to_string())
        .collect();

    let mut index = Vec::new();
    let mut rows = Vec::new();
    for line in lines {
        let mut fields = line.split(',');
        let label = fields.next().unwrap_or("");
        index.push(csv_to_cell(label));
        rows.push(fields.map(csv_to_cell).collect());
    }

    Frame::new(columns, index, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn csv_round_trip() {
        let frame = Frame::new(
            vec!["heating".to_string(), "cooling".to_string()],
            vec![json!("jan"), json!("feb")],
            vec![
                vec![json!(120.5), json!(0.0)],
                vec![json!(98), Value::Null],
            ],
        )
        .unwrap();

        let csv = to_csv(&frame);
        assert!(csv.starts_with("index,heating,cooling\n"));

        let parsed = from_csv(&csv).unwrap();
        assert_eq!(parsed.columns(), frame.columns());
        assert_eq!(parsed.numeric_column("heating").unwrap(), vec![120.5, 98.0]);
        assert_eq!(parsed.row(1).unwrap()[1], Value::Null);
    }

    #[test]
    fn empty_input_rejected() {
        assert!(matches!(from_csv("\n\n"), Err(FrameError::EmptyCsv)));
    }

    #[test]
    fn ragged_line_rejected() {
        let err = from_csv("index,a,b\nr1,1.0\n").unwrap_err();
        assert!(matches!(err, FrameError::RaggedRow { .. }));
    }
}
