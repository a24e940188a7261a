//! Error types for extracolslib

use thiserror::Error;

/// Errors that can occur while building a printer or rendering a table
#[derive(Error, Debug)]
pub enum ExtraColumnsError {
    /// A column spec did not split into exactly `<header>:<path>`
    #[error("unexpected extra-columns spec: {spec}, expected <header>:<json-path-expr>")]
    SpecSyntax { spec: String },

    /// The relaxed path normalizer rejected an expression
    #[error("unexpected path string {path:?}, expected a 'name1.name2' or '.name1.name2' or '{{name1.name2}}' or '{{.name1.name2}}'")]
    PathNormalization { path: String },

    /// A normalized path failed to parse into a query
    #[error("failed to compile query '{template}': {message}")]
    QueryCompile { template: String, message: String },

    /// The printer was handed something that is not a Table
    #[error("--extra-columns printing is not supported on non-Table objects (got kind {kind:?})")]
    UnsupportedInput { kind: String },

    /// A compiled query failed against a row's object
    #[error("query evaluation failed: {message}")]
    Evaluation { message: String },

    /// The requested output format cannot be served by this printer
    #[error("unable to match a printer suitable for the output format {format:?}, allowed formats are: {}", .allowed.join(","))]
    NoCompatiblePrinter { format: String, allowed: Vec<String> },

    /// IO error while writing to the sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
