//! Structural evaluation of parsed paths over `serde_json::Value`.

use std::cmp::Ordering;

use serde_json::Value;

use super::parser::{ArraySpec, CmpOp, Filter, Literal, Segment};

type EvalResult<T> = std::result::Result<T, String>;

/// Evaluation knobs shared by every segment of a query.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Evaluator {
    pub allow_missing_keys: bool,
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Evaluator {
    /// Walk `segments` starting from `root`, returning every match in order.
    pub fn eval_path<'a>(&self, segments: &[Segment], root: &'a Value) -> EvalResult<Vec<&'a Value>> {
        let mut current = vec![root];
        for segment in segments {
            current = self.eval_segment(segment, current)?;
        }
        Ok(current)
    }

    fn eval_segment<'a>(&self, segment: &Segment, input: Vec<&'a Value>) -> EvalResult<Vec<&'a Value>> {
        match segment {
            Segment::Field(name) => self.eval_field(name, input),
            Segment::Array(spec) => self.eval_array(spec, input),
            Segment::Wildcard => Ok(eval_wildcard(input)),
            Segment::Recursive => Ok(eval_recursive(input)),
            Segment::Filter(filter) => self.eval_filter(filter, input),
        }
    }

    fn eval_field<'a>(&self, name: &str, input: Vec<&'a Value>) -> EvalResult<Vec<&'a Value>> {
        if input.is_empty() {
            return Ok(input);
        }

        let results: Vec<&Value> = input
            .iter()
            .filter_map(|value| match value {
                Value::Object(map) => map.get(name),
                _ => None,
            })
            .collect();

        if results.is_empty() && !self.allow_missing_keys {
            return Err(format!("{} is not found", name));
        }
        Ok(results)
    }

    fn eval_array<'a>(&self, spec: &ArraySpec, input: Vec<&'a Value>) -> EvalResult<Vec<&'a Value>> {
        let mut results = Vec::new();

        for value in input {
            let items = match value {
                Value::Null => continue,
                Value::Array(items) => items,
                other => {
                    return Err(format!(
                        "{} is not array or slice, cannot index it with {}",
                        kind_name(other),
                        describe_spec(spec)
                    ))
                }
            };
            let len = items.len() as i64;

            if spec.single {
                let raw = spec.start.unwrap_or_default();
                let index = if raw < 0 { raw + len } else { raw };
                if index < 0 || index >= len {
                    if self.allow_missing_keys {
                        continue;
                    }
                    return Err(format!(
                        "array index out of bounds: index {}, length {}",
                        raw, len
                    ));
                }
                results.push(&items[index as usize]);
                continue;
            }

            let clamp = |bound: i64| -> i64 {
                let bound = if bound < 0 { bound + len } else { bound };
                bound.clamp(0, len)
            };
            let start = spec.start.map(clamp).unwrap_or(0);
            let end = spec.end.map(clamp).unwrap_or(len);
            let step = spec.step.unwrap_or(1).max(1) as usize;

            if start < end {
                results.extend(items[start as usize..end as usize].iter().step_by(step));
            }
        }

        Ok(results)
    }

    fn eval_filter<'a>(&self, filter: &Filter, input: Vec<&'a Value>) -> EvalResult<Vec<&'a Value>> {
        // Filters look inside elements, where absence simply means "no match".
        let inner = Evaluator {
            allow_missing_keys: true,
        };
        let mut results = Vec::new();

        for value in input {
            let items = match value {
                Value::Null => continue,
                Value::Array(items) => items,
                other => {
                    return Err(format!(
                        "{} is not array or slice and cannot be filtered",
                        kind_name(other)
                    ))
                }
            };

            for item in items {
                let found = inner.eval_path(&filter.path, item)?;
                let keep = match &filter.condition {
                    None => !found.is_empty(),
                    Some((op, literal)) => match found.as_slice() {
                        [] => false,
                        [single] => compare(single, *op, literal),
                        _ => return Err("can only compare one element at a time".to_string()),
                    },
                };
                if keep {
                    results.push(item);
                }
            }
        }

        Ok(results)
    }
}

fn eval_wildcard(input: Vec<&Value>) -> Vec<&Value> {
    let mut results = Vec::new();
    for value in input {
        match value {
            Value::Array(items) => results.extend(items.iter()),
            Value::Object(map) => results.extend(map.values()),
            _ => {}
        }
    }
    results
}

fn eval_recursive(input: Vec<&Value>) -> Vec<&Value> {
    fn walk<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
        out.push(value);
        match value {
            Value::Array(items) => items.iter().for_each(|item| walk(item, out)),
            Value::Object(map) => map.values().for_each(|item| walk(item, out)),
            _ => {}
        }
    }

    let mut results = Vec::new();
    for value in input {
        walk(value, &mut results);
    }
    results
}

fn describe_spec(spec: &ArraySpec) -> String {
    let show = |bound: Option<i64>| bound.map(|b| b.to_string()).unwrap_or_default();
    if spec.single {
        format!("[{}]", show(spec.start))
    } else {
        match spec.step {
            Some(step) => format!("[{}:{}:{}]", show(spec.start), show(spec.end), step),
            None => format!("[{}:{}]", show(spec.start), show(spec.end)),
        }
    }
}

fn compare(value: &Value, op: CmpOp, literal: &Literal) -> bool {
    let ordering = match (value, literal) {
        (Value::String(s), Literal::String(l)) => Some(s.as_str().cmp(l.as_str())),
        (Value::Number(n), Literal::Number(l)) => n.as_f64().and_then(|n| n.partial_cmp(l)),
        (Value::Bool(b), Literal::Bool(l)) => Some(b.cmp(l)),
        _ => None,
    };

    match (ordering, op) {
        (Some(ord), CmpOp::Eq) => ord == Ordering::Equal,
        (Some(ord), CmpOp::Ne) => ord != Ordering::Equal,
        (Some(ord), CmpOp::Lt) => ord == Ordering::Less,
        (Some(ord), CmpOp::Le) => ord != Ordering::Greater,
        (Some(ord), CmpOp::Gt) => ord == Ordering::Greater,
        (Some(ord), CmpOp::Ge) => ord != Ordering::Less,
        // Mismatched types are never equal and never ordered.
        (None, CmpOp::Ne) => true,
        (None, _) => false,
    }
}
