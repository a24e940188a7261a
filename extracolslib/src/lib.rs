//! # extracolslib
//!
//! Render server-side tables as tab-separated text, with extra user-defined
//! columns computed from each row's object by path queries.
//!
//! ## Overview
//!
//! A server-side table already carries its default columns (NAME, READY,
//! STATUS, ...) and, per row, the full object those cells were rendered from.
//! Extra columns let the user append more fields without switching to a
//! fully custom layout:
//!
//! - **Column specs**: `<HEADER>:<path>` strings such as `NODE:.spec.nodeName`
//! - **Path queries**: a JSONPath dialect evaluated per row, where a missing
//!   field is simply "no value" (printed as `<none>`)
//! - **Multi-valued matches**: every match gets its own tab-separated field
//! - **Header suppression**: extra headers print once per table shape, so
//!   repeated batches of the same resource kind stay compact
//!
//! ## Example
//!
//! ```rust
//! use extracolslib::{ColumnDefinition, ExtraColumnFlags, Object, Table, TableRow};
//! use serde_json::json;
//!
//! let table = Table::new(vec![ColumnDefinition::new("Name"), ColumnDefinition::new("Status")])
//!     .with_row(TableRow::new(
//!         vec![json!("testpod"), json!("Running")],
//!         json!({"metadata": {"name": "testpod"}, "spec": {"containers": [
//!             {"image": "nginx"}, {"image": "envoy"}
//!         ]}}),
//!     ));
//!
//! let mut printer = ExtraColumnFlags::new()
//!     .extra_column("IMAGES:.spec.containers[*].image")
//!     .extra_column("NODE:.spec.nodeName")
//!     .to_printer("")
//!     .unwrap();
//!
//! let mut out = Vec::new();
//! printer.print_obj(&Object::Table(table), &mut out).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "NAME\tSTATUS\tIMAGES\tNODE\ntestpod\tRunning\tnginx\tenvoy\t<none>\n"
//! );
//! ```

pub mod error;
pub mod flags;
pub mod jsonpath;
pub mod printer;
pub mod spec;
pub mod table;
pub mod value;

pub use error::ExtraColumnsError;
pub use flags::{is_no_compatible_printer_error, ExtraColumnFlags};
pub use jsonpath::{relaxed_json_path_expression, JsonPath};
pub use printer::{ExtraColumnsPrinter, PrintOptions, NONE_PLACEHOLDER};
pub use spec::{parse_column_specs, ColumnSpec};
pub use table::{ColumnDefinition, Object, Table, TableRow, TableShape};
pub use value::display_value;

/// Result type for extracolslib operations
pub type Result<T> = std::result::Result<T, ExtraColumnsError>;
