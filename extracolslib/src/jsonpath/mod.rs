//! Path queries over dynamically shaped values.
//!
//! Extra columns select values from each row's object with a compact path
//! language in the Kubernetes JSONPath dialect. This module provides:
//!
//! - **relaxed**: normalizes user shorthand (`.a.b`, `a.b`, `{a.b}`) into `{.a.b}`
//! - **parser**: turns a template into nodes and path segments
//! - **eval**: walks those segments over a `serde_json::Value`
//!
//! ## Example
//!
//! ```rust
//! use extracolslib::jsonpath::JsonPath;
//! use serde_json::json;
//!
//! let query = JsonPath::parse("{.spec.containers[*].image}")
//!     .unwrap()
//!     .allow_missing_keys(true);
//! let pod = json!({"spec": {"containers": [{"image": "nginx"}, {"image": "envoy"}]}});
//!
//! let groups = query.find_results(&pod).unwrap();
//! assert_eq!(groups, vec![vec![json!("nginx"), json!("envoy")]]);
//! ```

mod eval;
pub mod parser;
pub mod relaxed;

use serde_json::Value;

use crate::error::ExtraColumnsError;
use crate::Result;
use eval::Evaluator;
use parser::Node;

pub use relaxed::relaxed_json_path_expression;

/// A compiled path template.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath {
    template: String,
    nodes: Vec<Node>,
    allow_missing_keys: bool,
}

impl JsonPath {
    /// Parse a template such as `{.metadata.name}`.
    pub fn parse(template: &str) -> Result<Self> {
        let nodes =
            parser::parse_template(template).map_err(|message| ExtraColumnsError::QueryCompile {
                template: template.to_string(),
                message,
            })?;

        Ok(Self {
            template: template.to_string(),
            nodes,
            allow_missing_keys: false,
        })
    }

    /// Builder: treat missing fields and out-of-range indexes as empty matches.
    pub fn allow_missing_keys(mut self, allow: bool) -> Self {
        self.allow_missing_keys = allow;
        self
    }

    /// The template this query was parsed from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Evaluate against `data`, returning one group of matches per template node.
    pub fn find_results(&self, data: &Value) -> Result<Vec<Vec<Value>>> {
        let evaluator = Evaluator {
            allow_missing_keys: self.allow_missing_keys,
        };

        self.nodes
            .iter()
            .map(|node| match node {
                Node::Text(text) => Ok(vec![Value::String(text.clone())]),
                Node::Path(segments) => evaluator
                    .eval_path(segments, data)
                    .map(|found| found.into_iter().cloned().collect())
                    .map_err(|message| ExtraColumnsError::Evaluation {
                        message: format!("{}: {}", self.template, message),
                    }),
            })
            .collect()
    }
}
