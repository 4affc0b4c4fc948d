//! Compile filter expressions into broker filter policies.
//!
//! A policy is flat JSON: dotted attribute paths mapped to arrays of
//! condition objects, every one of which must hold. That is the shape
//! subscription brokers accept. [`FilterPolicy::matches`] applies the
//! same policy in process, through the same comparison primitives the
//! evaluator uses, so the two can never drift apart.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::evaluator;
use crate::path;
use crate::types::{CompareOp, Event, FilterExpression};

/// Numeric comparison operator in a policy condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericOp {
  #[serde(rename = "<")]
  Lt,
  #[serde(rename = "<=")]
  Lte,
  #[serde(rename = ">")]
  Gt,
  #[serde(rename = ">=")]
  Gte,
}

impl NumericOp {
  fn as_compare(self, bound: f64) -> CompareOp {
    match self {
      NumericOp::Lt => CompareOp::Lt(bound),
      NumericOp::Lte => CompareOp::Lte(bound),
      NumericOp::Gt => CompareOp::Gt(bound),
      NumericOp::Gte => CompareOp::Gte(bound),
    }
  }
}

impl fmt::Display for NumericOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NumericOp::Lt => write!(f, "<"),
      NumericOp::Lte => write!(f, "<="),
      NumericOp::Gt => write!(f, ">"),
      NumericOp::Gte => write!(f, ">="),
    }
  }
}

/// One condition attached to an attribute path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PolicyCondition {
  Equals(Value),
  Numeric(NumericOp, f64),
  Prefix(String),
  Includes(Value),
  /// Membership in a fixed set. Emitted by media type negotiation in
  /// the validator; the expression language never produces it.
  AnyOf(Vec<Value>),
}

/// A compiled, broker-native filter policy.
///
/// Keys are dotted attribute paths into the event wire form; values
/// are the conditions that must all hold for a subscription to receive
/// the event. Conjunctive within and across keys. Keys sort, so equal
/// expressions always compile to byte-equal policies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterPolicy(BTreeMap<String, Vec<PolicyCondition>>);

impl FilterPolicy {
  pub fn new() -> Self {
    Self::default()
  }

  /// True when the policy constrains nothing and matches everything.
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Number of constrained attribute paths.
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Conditions attached to one attribute path.
  pub fn conditions(&self, attribute_path: &str) -> &[PolicyCondition] {
    self.0.get(attribute_path).map(Vec::as_slice).unwrap_or(&[])
  }

  pub(crate) fn push(&mut self, attribute_path: impl Into<String>, condition: PolicyCondition) {
    self.0.entry(attribute_path.into()).or_default().push(condition);
  }

  pub(crate) fn merge(&mut self, other: FilterPolicy) {
    for (attribute_path, conditions) in other.0 {
      self.0.entry(attribute_path).or_default().extend(conditions);
    }
  }

  /// The policy as its JSON document, the form handed to a broker.
  pub fn to_value(&self) -> Value {
    serde_json::to_value(self).expect("policy form is plain data")
  }

  /// Applies the policy in process: every constrained path must exist
  /// on the event and satisfy all of its conditions.
  pub fn matches(&self, event: &Event) -> bool {
    self.matches_value(&event.wire_value())
  }

  /// Applies the policy to a pre-serialized wire value.
  pub fn matches_value(&self, root: &Value) -> bool {
    self.0.iter().all(|(attribute_path, conditions)| {
      match path::lookup(root, attribute_path) {
        Some(actual) => conditions.iter().all(|c| condition_holds(actual, c)),
        None => false,
      }
    })
  }
}

impl fmt::Display for FilterPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}",
      serde_json::to_string(self).expect("policy form is plain data")
    )
  }
}

/// Compiles an expression into the flat policy form.
///
/// Total by construction: every expression the typed constructors can
/// build translates, one condition per comparison.
#[instrument(level = "trace", skip(expr))]
pub fn compile(expr: &FilterExpression) -> FilterPolicy {
  let mut policy = FilterPolicy::new();
  add_conditions(expr, &mut policy);
  debug!(paths = policy.len(), "compiled filter policy");
  policy
}

fn add_conditions(expr: &FilterExpression, policy: &mut FilterPolicy) {
  match expr {
    FilterExpression::Compare(cmp) => policy.push(cmp.path(), condition_for(cmp.op())),
    FilterExpression::And(items) => {
      for item in items {
        add_conditions(item, policy);
      }
    }
  }
}

fn condition_for(op: &CompareOp) -> PolicyCondition {
  match op {
    CompareOp::Equals(want) => PolicyCondition::Equals(want.clone()),
    CompareOp::Lt(bound) => PolicyCondition::Numeric(NumericOp::Lt, *bound),
    CompareOp::Lte(bound) => PolicyCondition::Numeric(NumericOp::Lte, *bound),
    CompareOp::Gt(bound) => PolicyCondition::Numeric(NumericOp::Gt, *bound),
    CompareOp::Gte(bound) => PolicyCondition::Numeric(NumericOp::Gte, *bound),
    CompareOp::Includes(want) => PolicyCondition::Includes(want.clone()),
    CompareOp::StartsWith(prefix) => PolicyCondition::Prefix(prefix.clone()),
  }
}

fn condition_holds(actual: &Value, condition: &PolicyCondition) -> bool {
  match condition {
    PolicyCondition::Equals(want) => evaluator::value_eq(actual, want),
    PolicyCondition::Numeric(op, bound) => evaluator::compare(actual, &op.as_compare(*bound)),
    PolicyCondition::Prefix(prefix) => evaluator::starts_with(actual, prefix),
    PolicyCondition::Includes(want) => evaluator::includes(actual, want),
    PolicyCondition::AnyOf(options) => options.iter().any(|want| evaluator::value_eq(actual, want)),
  }
}
