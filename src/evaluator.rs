//! In-process evaluation of filter expressions.
//!
//! Shares its comparison primitives with the policy matcher in
//! [`compiler`](crate::compiler), so a filter behaves identically
//! whether it runs here or compiled into a broker subscription.

use serde_json::Value;

use crate::path;
use crate::types::{CompareOp, Comparison, Event, FilterExpression};

/// Evaluates `expr` against an event. Missing attributes never match.
pub fn evaluate(expr: &FilterExpression, event: &Event) -> bool {
  evaluate_value(expr, &event.wire_value())
}

/// Evaluates against a pre-serialized wire value; useful when one
/// event is tested against many expressions.
pub fn evaluate_value(expr: &FilterExpression, root: &Value) -> bool {
  match expr {
    FilterExpression::Compare(cmp) => compare_at(cmp, root),
    FilterExpression::And(items) => items.iter().all(|item| evaluate_value(item, root)),
  }
}

fn compare_at(cmp: &Comparison, root: &Value) -> bool {
  match path::lookup(root, cmp.path()) {
    Some(actual) => compare(actual, cmp.op()),
    None => false,
  }
}

/// Applies one comparison operator to an attribute value.
pub(crate) fn compare(actual: &Value, op: &CompareOp) -> bool {
  match op {
    CompareOp::Equals(want) => value_eq(actual, want),
    CompareOp::Lt(bound) => number(actual).is_some_and(|a| a < *bound),
    CompareOp::Lte(bound) => number(actual).is_some_and(|a| a <= *bound),
    CompareOp::Gt(bound) => number(actual).is_some_and(|a| a > *bound),
    CompareOp::Gte(bound) => number(actual).is_some_and(|a| a >= *bound),
    CompareOp::Includes(want) => includes(actual, want),
    CompareOp::StartsWith(prefix) => starts_with(actual, prefix),
  }
}

/// Equality with numeric awareness: `3` equals `3.0`, and strings
/// never equal numbers.
pub(crate) fn value_eq(actual: &Value, want: &Value) -> bool {
  match (actual.as_f64(), want.as_f64()) {
    (Some(a), Some(w)) => a == w,
    _ => actual == want,
  }
}

/// Substring on strings, membership on arrays, false elsewhere.
pub(crate) fn includes(actual: &Value, want: &Value) -> bool {
  match actual {
    Value::String(s) => want.as_str().is_some_and(|needle| s.contains(needle)),
    Value::Array(items) => items.iter().any(|item| value_eq(item, want)),
    _ => false,
  }
}

/// String prefix test, false for non-strings.
pub(crate) fn starts_with(actual: &Value, prefix: &str) -> bool {
  actual.as_str().is_some_and(|s| s.starts_with(prefix))
}

/// Ordering applies to JSON numbers only; strings never compare
/// numerically.
fn number(value: &Value) -> Option<f64> {
  value.as_f64()
}
