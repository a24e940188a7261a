//! Tab-separated table printer with extra columns.
//!
//! [`ExtraColumnsPrinter`] renders a server-side [`Table`] as text: the
//! table's default columns followed by the user's extra columns, one
//! tab-separated line per row.
//!
//! Header rules:
//! - no header at all when the table has no rows
//! - default headers are the upper-cased column names
//! - extra-column headers are printed only when the table's shape differs
//!   from the previously printed one, so repeated batches of the same
//!   resource kind do not repeat them
//!
//! Row rules:
//! - cells beyond the column definitions are dropped
//! - an absent cell is an empty field
//! - an extra column with no match prints `<none>`
//! - an extra column with N matches prints N fields
//!
//! ## Example
//!
//! ```rust
//! use extracolslib::{ColumnDefinition, ExtraColumnsPrinter, Object, PrintOptions, Table, TableRow};
//! use serde_json::json;
//!
//! let mut printer =
//!     ExtraColumnsPrinter::new(&["NODE:.spec.nodeName"], PrintOptions::new()).unwrap();
//! let table = Table::new(vec![ColumnDefinition::new("Name")]).with_row(TableRow::new(
//!     vec![json!("web-0")],
//!     json!({"spec": {"nodeName": "worker-1"}}),
//! ));
//!
//! let mut out = Vec::new();
//! printer.print_obj(&Object::Table(table), &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "NAME\tNODE\nweb-0\tworker-1\n");
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ExtraColumnsError;
use crate::jsonpath::JsonPath;
use crate::spec::{parse_column_specs, ColumnSpec};
use crate::table::{ColumnDefinition, Object, Table, TableShape};
use crate::value::{display_cell, display_value};
use crate::Result;

/// Field printed for an extra column whose query matched nothing.
pub const NONE_PLACEHOLDER: &str = "<none>";

/// Printing options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    /// Never print the header line
    pub no_headers: bool,
    /// The caller asked for the "wide" output format
    pub wide: bool,
    /// Show columns with a non-zero priority
    ///
    /// Independent of `wide`: priority columns stay hidden unless this is set.
    pub show_priority_columns: bool,
}

impl PrintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: suppress headers
    pub fn with_no_headers(mut self, no_headers: bool) -> Self {
        self.no_headers = no_headers;
        self
    }

    /// Builder: record the wide output format
    pub fn with_wide(mut self, wide: bool) -> Self {
        self.wide = wide;
        self
    }

    /// Builder: show priority columns
    pub fn with_priority_columns(mut self, show: bool) -> Self {
        self.show_priority_columns = show;
        self
    }
}

/// Prints tables with user-defined extra columns appended.
#[derive(Debug, Clone)]
pub struct ExtraColumnsPrinter {
    columns: Vec<ColumnSpec>,
    options: PrintOptions,
    last_shape: Option<TableShape>,
}

impl ExtraColumnsPrinter {
    /// Create a printer from raw `<header>:<path-expr>` specs.
    ///
    /// Fails on the first malformed spec.
    pub fn new<S: AsRef<str>>(specs: &[S], options: PrintOptions) -> Result<Self> {
        let columns = parse_column_specs(specs)?;
        debug!(columns = columns.len(), ?options, "extra columns parsed");
        Ok(Self::from_columns(columns, options))
    }

    /// Create a printer from already parsed column specs.
    pub fn from_columns(columns: Vec<ColumnSpec>, options: PrintOptions) -> Self {
        Self {
            columns,
            options,
            last_shape: None,
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn options(&self) -> PrintOptions {
        self.options
    }

    /// Print `obj` to `output`: headers first, then one line per row.
    ///
    /// Only tables are printable. Every column is compiled before anything
    /// is written, so a bad path produces no output at all.
    pub fn print_obj<W: Write>(&mut self, obj: &Object, output: &mut W) -> Result<()> {
        let table = match obj {
            Object::Table(table) => table,
            other => {
                return Err(ExtraColumnsError::UnsupportedInput {
                    kind: other.kind().to_string(),
                })
            }
        };

        let parsers = self.compile_columns()?;

        self.print_headers(table, output)?;
        self.print_rows(table, &parsers, output)
    }

    /// Compile every extra column, tolerating missing keys.
    pub fn compile_columns(&self) -> Result<Vec<JsonPath>> {
        self.columns.iter().map(ColumnSpec::compile).collect()
    }

    /// Print the header line for `table`, if one is due.
    pub fn print_headers<W: Write>(&mut self, table: &Table, output: &mut W) -> Result<()> {
        if self.options.no_headers {
            return Ok(());
        }

        // A header over an empty result set would be misleading
        if table.rows.is_empty() {
            return Ok(());
        }

        let mut headers: Vec<String> = table
            .column_definitions
            .iter()
            .filter(|column| self.is_visible(column))
            .map(|column| column.name.to_uppercase())
            .collect();

        let shape = table.shape();
        if self.last_shape.as_ref() != Some(&shape) {
            trace!(kind = %shape.kind, "table shape changed, printing extra headers");
            headers.extend(self.columns.iter().map(|column| column.header.clone()));
            self.last_shape = Some(shape);
        }

        write_line(output, &headers)
    }

    /// Print one line per row: visible default cells, then extra columns.
    ///
    /// A query failure aborts the call; lines already written stay written.
    pub fn print_rows<W: Write>(
        &self,
        table: &Table,
        parsers: &[JsonPath],
        output: &mut W,
    ) -> Result<()> {
        debug!(rows = table.rows.len(), "printing rows");

        for row in &table.rows {
            // zip stops at the shorter side, dropping cells without a definition
            let mut fields: Vec<String> = row
                .cells
                .iter()
                .zip(&table.column_definitions)
                .filter(|(_, column)| self.is_visible(column))
                .map(|(cell, _)| display_cell(cell))
                .collect();

            for parser in parsers {
                let matches: Vec<String> = parser
                    .find_results(&row.object)?
                    .iter()
                    .flatten()
                    .map(display_value)
                    .collect();

                if matches.is_empty() {
                    fields.push(NONE_PLACEHOLDER.to_string());
                } else {
                    fields.extend(matches);
                }
            }

            write_line(output, &fields)?;
        }

        Ok(())
    }

    fn is_visible(&self, column: &ColumnDefinition) -> bool {
        self.options.show_priority_columns || !column.is_priority()
    }
}

fn write_line<W: Write>(output: &mut W, fields: &[String]) -> Result<()> {
    let mut line = fields.join("\t");
    line.push('\n');
    output.write_all(line.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableRow;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn pod_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("Name"),
            ColumnDefinition::new("Ready"),
            ColumnDefinition::new("Status"),
            ColumnDefinition::new("Restarts").with_type("integer"),
            ColumnDefinition::new("Age"),
        ]
    }

    fn pod_table(object: Value) -> Table {
        Table::new(pod_columns()).with_row(TableRow::new(
            vec![
                json!("testpod"),
                json!("1/1"),
                json!("Running"),
                json!(1),
                json!("24d"),
            ],
            object,
        ))
    }

    fn render(printer: &mut ExtraColumnsPrinter, table: Table) -> String {
        let mut out = Vec::new();
        printer.print_obj(&Object::Table(table), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn printer(specs: &[&str]) -> ExtraColumnsPrinter {
        ExtraColumnsPrinter::new(specs, PrintOptions::new()).unwrap()
    }

    #[test]
    fn test_metadata_name_column() {
        let mut p = printer(&["NAME:.metadata.name"]);
        let output = render(&mut p, pod_table(json!({"metadata": {"name": "testpod"}})));
        assert_eq!(
            output,
            "NAME\tREADY\tSTATUS\tRESTARTS\tAGE\tNAME\ntestpod\t1/1\tRunning\t1\t24d\ttestpod\n"
        );
    }

    #[test]
    fn test_missing_path_prints_none() {
        let mut p = printer(&["NAME:.metadata.names"]);
        let output = render(&mut p, pod_table(json!({"metadata": {"name": "testpod"}})));
        assert_eq!(
            output.lines().nth(1),
            Some("testpod\t1/1\tRunning\t1\t24d\t<none>")
        );
    }

    #[test]
    fn test_multi_valued_match_expands_fields() {
        let mut p = printer(&["IMAGES:.spec.containers[*].image"]);
        let object = json!({"spec": {"containers": [{"image": "nginx"}, {"image": "envoy"}]}});
        let output = render(&mut p, pod_table(object));
        let data = output.lines().nth(1).unwrap();
        assert_eq!(data, "testpod\t1/1\tRunning\t1\t24d\tnginx\tenvoy");
        // Ragged: one more data field than header fields
        let header = output.lines().next().unwrap();
        assert_eq!(header.split('\t').count() + 1, data.split('\t').count());
    }

    #[test]
    fn test_array_value_is_one_field_when_not_expanded() {
        let mut p = printer(&["ARGS:.spec.args"]);
        let output = render(&mut p, pod_table(json!({"spec": {"args": ["a", "b"]}})));
        assert!(output.ends_with("24d\t[\"a\",\"b\"]\n"));
    }

    #[test]
    fn test_extra_headers_follow_shape_changes() {
        let mut p = printer(&["NODE:.spec.nodeName"]);
        let object = json!({"spec": {"nodeName": "worker-1"}});

        let first = render(&mut p, pod_table(object.clone()));
        assert!(first.starts_with("NAME\tREADY\tSTATUS\tRESTARTS\tAGE\tNODE\n"));

        let second = render(&mut p, pod_table(object.clone()));
        assert!(second.starts_with("NAME\tREADY\tSTATUS\tRESTARTS\tAGE\n"));
        assert!(second.ends_with("24d\tworker-1\n"));

        let nodes = Table::new(vec![ColumnDefinition::new("Name"), ColumnDefinition::new("Roles")])
            .with_row(TableRow::new(
                vec![json!("worker-1"), json!("<none>")],
                json!({"spec": {}}),
            ));
        assert_eq!(render(&mut p, nodes), "NAME\tROLES\tNODE\nworker-1\t<none>\t<none>\n");

        let third = render(&mut p, pod_table(object));
        assert!(third.starts_with("NAME\tREADY\tSTATUS\tRESTARTS\tAGE\tNODE\n"));
    }

    #[test]
    fn test_no_header_without_rows() {
        let mut p = printer(&["NAME:.metadata.name"]);
        assert_eq!(render(&mut p, Table::new(pod_columns())), "");
        // The empty table did not consume the extra header
        let output = render(&mut p, pod_table(json!({"metadata": {"name": "x"}})));
        assert!(output.starts_with("NAME\tREADY\tSTATUS\tRESTARTS\tAGE\tNAME\n"));
    }

    #[test]
    fn test_no_headers_option() {
        let mut p = ExtraColumnsPrinter::new(
            &["NAME:.metadata.name"],
            PrintOptions::new().with_no_headers(true),
        )
        .unwrap();
        let output = render(&mut p, pod_table(json!({"metadata": {"name": "testpod"}})));
        assert_eq!(output, "testpod\t1/1\tRunning\t1\t24d\ttestpod\n");
    }

    fn wide_pod_table() -> Table {
        let mut columns = pod_columns();
        columns.push(ColumnDefinition::new("IP").with_priority(1));
        columns.push(ColumnDefinition::new("Node").with_priority(1));
        Table::new(columns).with_row(TableRow::new(
            vec![
                json!("testpod"),
                json!("1/1"),
                json!("Running"),
                json!(1),
                json!("24d"),
                json!("10.0.0.7"),
                json!("worker-1"),
            ],
            json!({}),
        ))
    }

    #[test]
    fn test_priority_columns_hidden_even_when_wide() {
        let mut p = ExtraColumnsPrinter::new::<&str>(&[], PrintOptions::new().with_wide(true)).unwrap();
        let output = render(&mut p, wide_pod_table());
        assert_eq!(
            output,
            "NAME\tREADY\tSTATUS\tRESTARTS\tAGE\ntestpod\t1/1\tRunning\t1\t24d\n"
        );
    }

    #[test]
    fn test_priority_columns_opt_in() {
        let mut p =
            ExtraColumnsPrinter::new::<&str>(&[], PrintOptions::new().with_priority_columns(true))
                .unwrap();
        let output = render(&mut p, wide_pod_table());
        assert_eq!(
            output,
            "NAME\tREADY\tSTATUS\tRESTARTS\tAGE\tIP\tNODE\n\
             testpod\t1/1\tRunning\t1\t24d\t10.0.0.7\tworker-1\n"
        );
    }

    #[test]
    fn test_extra_cells_are_dropped() {
        let mut p = printer(&[]);
        let table = Table::new(vec![ColumnDefinition::new("Name")]).with_row(TableRow::new(
            vec![json!("a"), json!("b"), json!("c")],
            json!({}),
        ));
        assert_eq!(render(&mut p, table), "NAME\na\n");
    }

    #[test]
    fn test_absent_cell_is_empty_field() {
        let mut p = printer(&[]);
        let table = Table::new(vec![ColumnDefinition::new("Name"), ColumnDefinition::new("Age")])
            .with_row(TableRow::new(vec![Value::Null, json!("3d")], json!({})));
        assert_eq!(render(&mut p, table), "NAME\tAGE\n\t3d\n");
    }

    #[test]
    fn test_rejects_non_table() {
        let mut p = printer(&["NAME:.metadata.name"]);
        let mut out = Vec::new();
        let err = p
            .print_obj(&Object::Unstructured(json!({"kind": "Pod"})), &mut out)
            .unwrap_err();
        assert!(matches!(err, ExtraColumnsError::UnsupportedInput { ref kind } if kind == "Pod"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_compile_failure_writes_nothing() {
        let mut p = printer(&["FIRST:.items[x]"]);
        let mut out = Vec::new();
        let err = p
            .print_obj(&Object::Table(pod_table(json!({}))), &mut out)
            .unwrap_err();
        assert!(matches!(err, ExtraColumnsError::QueryCompile { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_evaluation_failure_keeps_earlier_rows() {
        let mut p = printer(&["FIRST:.spec.items[0]"]);
        let table = Table::new(vec![ColumnDefinition::new("Name")])
            .with_row(TableRow::new(vec![json!("ok")], json!({"spec": {"items": [1]}})))
            .with_row(TableRow::new(vec![json!("bad")], json!({"spec": {"items": "x"}})));

        let mut out = Vec::new();
        let err = p.print_obj(&Object::Table(table), &mut out).unwrap_err();
        assert!(matches!(err, ExtraColumnsError::Evaluation { .. }));
        assert_eq!(String::from_utf8(out).unwrap(), "NAME\tFIRST\nok\t1\n");
    }
}
