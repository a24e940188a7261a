//! Generic stringification of dynamic values.
//!
//! Cells and query matches are `serde_json::Value`s of unknown shape. Both
//! segments of a row go through [`display_value`], so a number renders the
//! same whether it came from a default cell or from an extra column.

use serde_json::Value;

/// Text used when a query match is itself a JSON `null`.
pub const NIL: &str = "<nil>";

/// Convert a value to the text printed in a table field.
///
/// Strings print without quotes, scalars in their JSON spelling, and
/// composite values as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => NIL.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Convert an optional default-column cell to text.
///
/// An absent cell (`null`) is an empty field, not a placeholder.
pub fn display_cell(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        other => display_value(other),
    }
}
