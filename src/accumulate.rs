//! Folding the top-level field list into the elements of the output array.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::ConflictError;
use crate::parser::Field;
use crate::reduce::{merge_entry, reduce_entry};

/// Collects array elements. Consecutive dotted/grouped fields are merged into one pending object
/// for as long as the merge policy allows; a bare name or a conflicting field closes it.
#[derive(Debug, Default)]
pub struct ElementAccumulator {
    elements: Vec<Value>,
    pending: Option<Map<String, Value>>,
}

impl ElementAccumulator {
    pub fn push(&mut self, field: &Field) -> Result<(), ConflictError> {
        if let Field::Leaf { name } = field {
            self.flush();
            self.elements.push(Value::String(name.val.clone()));
            return Ok(());
        }

        let (key, value) = reduce_entry(field)?;
        let rejected = match self.pending.as_mut() {
            Some(pending) => match merge_entry(pending, key.clone(), value) {
                Ok(()) => {
                    trace!(%key, "merged into pending element");
                    return Ok(());
                }
                Err(value) => value,
            },
            None => value,
        };

        self.flush();
        let mut fresh = Map::new();
        fresh.insert(key, rejected);
        self.pending = Some(fresh);
        Ok(())
    }

    fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(keys = pending.len(), "closing element");
            self.elements.push(Value::Object(pending));
        }
    }

    pub fn finish(mut self) -> Vec<Value> {
        self.flush();
        self.elements
    }
}

/// Reduces a parsed top-level field list to the array elements it denotes.
pub fn accumulate<'f>(
    fields: impl IntoIterator<Item = &'f Field>,
) -> Result<Vec<Value>, ConflictError> {
    let mut acc = ElementAccumulator::default();
    for field in fields {
        acc.push(field)?;
    }
    Ok(acc.finish())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parser::parse_fields;

    fn run(src: &str) -> Value {
        let fields = parse_fields(src).unwrap();
        Value::Array(accumulate(&fields).unwrap())
    }

    #[test]
    fn test_no_fields_no_elements() {
        assert_eq!(run(""), json!([]));
    }

    #[test]
    fn test_bare_names_stand_alone() {
        assert_eq!(run("x, y, z"), json!(["x", "y", "z"]));
        assert_eq!(run("42"), json!(["42"]));
    }

    #[test]
    fn test_bare_name_flushes_pending_object() {
        assert_eq!(run("a, b.c"), json!(["a", {"b": "c"}]));
        assert_eq!(run("b.c, a, d.e"), json!([{"b": "c"}, "a", {"d": "e"}]));
    }

    #[test]
    fn test_compatible_fields_share_an_element() {
        assert_eq!(run("a.b.c, d.e"), json!([{"a": {"b": "c"}, "d": "e"}]));
        assert_eq!(run("a.b.c, a.b.d"), json!([{"a": {"b": ["c", "d"]}}]));
    }

    #[test]
    fn test_conflict_starts_a_new_element() {
        assert_eq!(
            run("a.b.x.p, a.b.x.q, a.b.y, a.c.z"),
            json!([{"a": {"b": {"x": ["p", "q"]}}}, {"a": {"b": "y", "c": "z"}}])
        );
        assert_eq!(
            run("a.b.c, a.b.d, a.c"),
            json!([{"a": {"b": ["c", "d"]}}, {"a": "c"}])
        );
    }

    #[test]
    fn test_rejected_field_does_not_leak_into_closed_element() {
        // `a.x` merges at `a`, but `a.b` is a string and cannot take an object.
        assert_eq!(
            run("a(b.c, d.e), a(x.y, b.q.r)"),
            json!([{"a": {"b": "c", "d": "e"}}, {"a": {"x": "y", "b": {"q": "r"}}}])
        );
    }

    #[test]
    fn test_group_at_top_level() {
        assert_eq!(run("a(b, c), a.d"), json!([{"a": ["b", "c", "d"]}]));
    }

    #[test]
    fn test_conflict_inside_group_fails() {
        let fields = parse_fields("ok.x, a(b, b.c)").unwrap();
        let err = accumulate(&fields).unwrap_err();
        assert_eq!(err.name, "b");
    }
}
