//! Conversions between CST positions and LSP wire positions.

use jasmin_cst::{Point, Range};
use lsp_types::Position;
use serde_json::{Value, json};

/// CST point → LSP `Position`.
pub fn point_to_position(point: Point) -> Position {
    Position { line: point.row as u32, character: point.column as u32 }
}

/// CST range → typed LSP `Range`.
pub fn lsp_range(range: &Range) -> lsp_types::Range {
    lsp_types::Range {
        start: point_to_position(range.start_point),
        end: point_to_position(range.end_point),
    }
}

/// CST range → LSP `Range` JSON.
pub fn range_to_lsp(range: &Range) -> Value {
    serde_json::to_value(lsp_range(range)).unwrap_or(Value::Null)
}

/// LSP `Position` JSON → CST point.
pub fn position_to_point(value: &Value) -> Option<Point> {
    let position: Position = serde_json::from_value(value.clone()).ok()?;
    Some(Point::new(position.line as usize, position.character as usize))
}

/// A `Location` JSON value for a range in a file.
pub fn location(uri: &str, range: &Range) -> Value {
    json!({ "uri": uri, "range": range_to_lsp(range) })
}

/// A zero-width `Location` at the start of a file.
pub fn file_start_location(uri: &str) -> Value {
    json!({
        "uri": uri,
        "range": { "start": { "line": 0, "character": 0 }, "end": { "line": 0, "character": 0 } }
    })
}
