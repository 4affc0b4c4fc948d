//! Data-only filter expressions over event attributes.

use serde::Serialize;
use serde_json::Value;

/// Comparison operator plus its operand.
///
/// Operands are typed per operator, so an expression that exists can
/// always be compiled: ordering operators carry numbers, `StartsWith`
/// carries a string, and no other shapes are representable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareOp {
  /// Value equality. Numbers compare numerically, `3` equals `3.0`.
  Equals(Value),
  Lt(f64),
  Lte(f64),
  Gt(f64),
  Gte(f64),
  /// Substring on strings, membership on arrays.
  Includes(Value),
  StartsWith(String),
}

/// One comparison against a dotted attribute path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
  path: String,
  op: CompareOp,
}

impl Comparison {
  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn op(&self) -> &CompareOp {
    &self.op
  }
}

/// A routing predicate over an event's wire form.
///
/// Expressions are plain data. The same expression compiles to a broker
/// filter policy and evaluates in process, with identical semantics.
/// Conjunction is the only combinator; broker subscriptions cannot
/// express disjunction, and this type does not pretend otherwise.
///
/// Construction goes through the typed constructors below. Expressions
/// serialize for inspection but deliberately do not deserialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterExpression {
  Compare(Comparison),
  And(Vec<FilterExpression>),
}

impl FilterExpression {
  /// `path == operand`.
  pub fn equals(path: impl Into<String>, operand: impl Into<Value>) -> Self {
    Self::compare(path, CompareOp::Equals(operand.into()))
  }

  /// `path < operand`, numeric.
  pub fn lt(path: impl Into<String>, operand: f64) -> Self {
    Self::compare(path, CompareOp::Lt(operand))
  }

  /// `path <= operand`, numeric.
  pub fn lte(path: impl Into<String>, operand: f64) -> Self {
    Self::compare(path, CompareOp::Lte(operand))
  }

  /// `path > operand`, numeric.
  pub fn gt(path: impl Into<String>, operand: f64) -> Self {
    Self::compare(path, CompareOp::Gt(operand))
  }

  /// `path >= operand`, numeric.
  pub fn gte(path: impl Into<String>, operand: f64) -> Self {
    Self::compare(path, CompareOp::Gte(operand))
  }

  /// Substring test on string attributes, membership on arrays.
  pub fn includes(path: impl Into<String>, operand: impl Into<Value>) -> Self {
    Self::compare(path, CompareOp::Includes(operand.into()))
  }

  /// String prefix test.
  pub fn starts_with(path: impl Into<String>, prefix: impl Into<String>) -> Self {
    Self::compare(path, CompareOp::StartsWith(prefix.into()))
  }

  /// Conjunction of every expression in `items`. Empty input matches
  /// everything.
  pub fn all(items: impl IntoIterator<Item = FilterExpression>) -> Self {
    FilterExpression::And(items.into_iter().collect())
  }

  /// Conjunction, flattening nested `And` nodes.
  pub fn and(self, other: FilterExpression) -> Self {
    match (self, other) {
      (FilterExpression::And(mut items), FilterExpression::And(more)) => {
        items.extend(more);
        FilterExpression::And(items)
      }
      (FilterExpression::And(mut items), single) => {
        items.push(single);
        FilterExpression::And(items)
      }
      (single, FilterExpression::And(more)) => {
        let mut items = vec![single];
        items.extend(more);
        FilterExpression::And(items)
      }
      (a, b) => FilterExpression::And(vec![a, b]),
    }
  }

  fn compare(path: impl Into<String>, op: CompareOp) -> Self {
    FilterExpression::Compare(Comparison {
      path: path.into(),
      op,
    })
  }
}
