//! Dotted attribute paths into an event's wire form.

use serde_json::Value;

/// Looks up `path` in `root`, one dot-separated segment at a time.
///
/// Object segments select by key; array segments select by zero-based
/// index. Anything unmatched, including an empty path or segment,
/// resolves to `None` rather than an error: a missing attribute is an
/// ordinary non-match everywhere this is used.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
  if path.is_empty() {
    return None;
  }
  let mut current = root;
  for segment in path.split('.') {
    current = match current {
      Value::Object(map) => map.get(segment)?,
      Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
      _ => return None,
    };
  }
  Some(current)
}
