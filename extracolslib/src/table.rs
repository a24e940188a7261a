//! Server-side table model.
//!
//! This mirrors the API's `Table` document: column definitions, and rows that
//! carry both pre-rendered cells and the full object they were rendered from.
//!
//! The data flow is:
//! 1. The server renders a `Table` (default columns + per-row objects)
//! 2. The caller wraps it in an [`Object`]
//! 3. The printer reads it, never mutating it

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind string that marks a JSON document as a table.
pub const TABLE_KIND: &str = "Table";

/// Definition of one default column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// Column name, upper-cased for the header line
    pub name: String,
    /// Value type hint ("string", "integer", ...)
    #[serde(rename = "type", default)]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// 0 for default columns; anything else is only shown in wide views
    #[serde(default)]
    pub priority: i32,
}

impl ColumnDefinition {
    /// Create a default-priority column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: "string".to_string(),
            ..Default::default()
        }
    }

    /// Builder: set the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: set the value type hint
    pub fn with_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }

    /// Whether the column is hidden from the default view.
    pub fn is_priority(&self) -> bool {
        self.priority != 0
    }
}

/// A single row of a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells aligned with the column definitions; `null` is an absent cell
    #[serde(default)]
    pub cells: Vec<Value>,
    /// The object the row describes; extra-column queries run against it
    #[serde(default)]
    pub object: Value,
}

impl TableRow {
    pub fn new(cells: Vec<Value>, object: Value) -> Self {
        Self { cells, object }
    }
}

/// A table: column definitions plus rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub column_definitions: Vec<ColumnDefinition>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create an empty table with the given column definitions.
    pub fn new(column_definitions: Vec<ColumnDefinition>) -> Self {
        Self {
            api_version: "meta.k8s.io/v1".to_string(),
            kind: TABLE_KIND.to_string(),
            column_definitions,
            rows: Vec::new(),
        }
    }

    /// Builder: append a row
    pub fn with_row(mut self, row: TableRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Structural identity of this table, used for header suppression.
    pub fn shape(&self) -> TableShape {
        TableShape {
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            columns: self
                .column_definitions
                .iter()
                .map(|c| (c.name.clone(), c.priority))
                .collect(),
        }
    }
}

/// Structural type of a table.
///
/// Two tables share a shape when they have the same type metadata and the
/// same ordered column names and priorities, i.e. they list the same kind
/// of resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableShape {
    pub api_version: String,
    pub kind: String,
    pub columns: Vec<(String, i32)>,
}

/// Anything handed to the printer.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// A server-side table, the only printable input
    Table(Table),
    /// Any other document
    Unstructured(Value),
}

impl Object {
    /// Classify a decoded JSON document by its `kind`.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if value.get("kind").and_then(Value::as_str) == Some(TABLE_KIND) {
            Ok(Object::Table(serde_json::from_value(value)?))
        } else {
            Ok(Object::Unstructured(value))
        }
    }

    /// The document's kind, or an empty string when it has none.
    pub fn kind(&self) -> &str {
        match self {
            Object::Table(table) => &table.kind,
            Object::Unstructured(value) => value.get("kind").and_then(Value::as_str).unwrap_or(""),
        }
    }
}

impl From<Table> for Object {
    fn from(table: Table) -> Self {
        Object::Table(table)
    }
}
