//! Relaxed path expressions.
//!
//! Users type column paths in several shorthand forms. They all describe the
//! same thing, so they are rewritten into the one canonical template form the
//! parser understands: `{.name1.name2}`.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ExtraColumnsError;
use crate::Result;

fn relaxed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\{\.?([^{}]+)\}$|^\.?([^{}]+)$").expect("relaxed path regex is valid")
    })
}

/// Normalize a relaxed path expression into a `{.path}` template.
///
/// Accepted shapes are `name1.name2`, `.name1.name2`, `{name1.name2}` and
/// `{.name1.name2}`. An empty expression is returned unchanged.
///
/// ```
/// use extracolslib::jsonpath::relaxed_json_path_expression;
///
/// assert_eq!(relaxed_json_path_expression("metadata.name").unwrap(), "{.metadata.name}");
/// assert_eq!(relaxed_json_path_expression("{.spec.nodeName}").unwrap(), "{.spec.nodeName}");
/// ```
pub fn relaxed_json_path_expression(path: &str) -> Result<String> {
    if path.is_empty() {
        return Ok(String::new());
    }

    let captures =
        relaxed_regex()
            .captures(path)
            .ok_or_else(|| ExtraColumnsError::PathNormalization {
                path: path.to_string(),
            })?;

    let field_spec = captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default();

    Ok(format!("{{.{}}}", field_spec))
}
