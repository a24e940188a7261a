//! Column spec parsing.
//!
//! Extra columns are given as `<header>:<path-expr>` strings, for example
//! `NODE:.spec.nodeName`. Parsing validates the shape and normalizes the path;
//! compiling turns the path into a query that tolerates missing fields.

use serde::{Deserialize, Serialize};

use crate::error::ExtraColumnsError;
use crate::jsonpath::{relaxed_json_path_expression, JsonPath};
use crate::Result;

/// Separator between the header and the path expression.
pub const SPEC_SEPARATOR: char = ':';

/// A user-defined column: its header and its normalized path template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Header text, printed as given
    pub header: String,
    /// Canonical `{...}` path template
    pub field_spec: String,
}

impl ColumnSpec {
    /// Parse a single `<header>:<path-expr>` string.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split(SPEC_SEPARATOR).collect();
        if parts.len() != 2 || parts[0].is_empty() {
            return Err(ExtraColumnsError::SpecSyntax {
                spec: raw.to_string(),
            });
        }

        Ok(Self {
            header: parts[0].to_string(),
            field_spec: relaxed_json_path_expression(parts[1])?,
        })
    }

    /// Compile the path into a query that treats missing fields as no match.
    pub fn compile(&self) -> Result<JsonPath> {
        Ok(JsonPath::parse(&self.field_spec)?.allow_missing_keys(true))
    }
}

/// Parse a batch of raw specs. The first invalid spec fails the whole batch.
pub fn parse_column_specs<S: AsRef<str>>(specs: &[S]) -> Result<Vec<ColumnSpec>> {
    specs
        .iter()
        .map(|spec| ColumnSpec::parse(spec.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order() {
        let specs = parse_column_specs(&["NAME:.metadata.name", "NODE:spec.nodeName"]).unwrap();
        assert_eq!(
            specs,
            vec![
                ColumnSpec {
                    header: "NAME".to_string(),
                    field_spec: "{.metadata.name}".to_string(),
                },
                ColumnSpec {
                    header: "NODE".to_string(),
                    field_spec: "{.spec.nodeName}".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_batch() {
        let specs = parse_column_specs::<&str>(&[]).unwrap();
        assert!(specs.is_empty());
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_column_specs(&["NAME:.metadata.name", "NAME.metadata.name"]).unwrap_err();
        assert!(matches!(err, ExtraColumnsError::SpecSyntax { ref spec } if spec == "NAME.metadata.name"));
        assert_eq!(
            err.to_string(),
            "unexpected extra-columns spec: NAME.metadata.name, expected <header>:<json-path-expr>"
        );
    }

    #[test]
    fn test_too_many_separators() {
        let err = ColumnSpec::parse("IMAGE:.spec.image:latest").unwrap_err();
        assert!(matches!(err, ExtraColumnsError::SpecSyntax { .. }));
    }

    #[test]
    fn test_empty_header() {
        let err = ColumnSpec::parse(":.metadata.name").unwrap_err();
        assert!(matches!(err, ExtraColumnsError::SpecSyntax { .. }));
    }

    #[test]
    fn test_bad_path_is_normalization_error() {
        let err = ColumnSpec::parse("NAME:{.metadata.name").unwrap_err();
        assert!(matches!(err, ExtraColumnsError::PathNormalization { .. }));
    }

    #[test]
    fn test_compile_tolerates_missing_keys() {
        let query = ColumnSpec::parse("NAME:.metadata.names")
            .unwrap()
            .compile()
            .unwrap();
        let groups = query
            .find_results(&serde_json::json!({"metadata": {"name": "x"}}))
            .unwrap();
        assert!(groups.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_compile_error() {
        let err = ColumnSpec::parse("FIRST:.items[x]")
            .unwrap()
            .compile()
            .unwrap_err();
        assert!(matches!(err, ExtraColumnsError::QueryCompile { .. }));
    }
}
