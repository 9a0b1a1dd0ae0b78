//! Turning parsed fields back into JSON values.
//!
//! Two values that land on the same key are combined with one merge policy:
//!
//! | existing | incoming | result                         |
//! |----------|----------|--------------------------------|
//! | absent   | any      | incoming                       |
//! | string   | string   | `[existing, incoming]`         |
//! | array    | string   | incoming appended to the array |
//! | object   | object   | key-wise merge, recursively    |
//! | other    | other    | conflict                       |
//!
//! Merges are all-or-nothing: the whole incoming value is checked before anything is written.

use serde_json::{Map, Value};

use crate::error::ConflictError;
use crate::parser::Field;

/// Whether `incoming` can be merged into `existing` without hitting a conflict anywhere.
pub fn can_merge(existing: &Value, incoming: &Value) -> bool {
    match (existing, incoming) {
        (Value::String(_), Value::String(_)) | (Value::Array(_), Value::String(_)) => true,
        (Value::Object(into), Value::Object(from)) => from
            .iter()
            .all(|(key, value)| into.get(key).map_or(true, |e| can_merge(e, value))),
        _ => false,
    }
}

/// Merges `incoming` into the value held at `key`, inserting it if the key is absent. On a
/// conflict `map` is left untouched and `incoming` is handed back.
pub fn merge_entry(
    map: &mut Map<String, Value>,
    key: String,
    incoming: Value,
) -> Result<(), Value> {
    let Some(existing) = map.get_mut(&key) else {
        map.insert(key, incoming);
        return Ok(());
    };
    if !can_merge(existing, &incoming) {
        return Err(incoming);
    }
    merge_checked(existing, incoming);
    Ok(())
}

/// Only called once [`can_merge`] has accepted the pair.
fn merge_checked(existing: &mut Value, incoming: Value) {
    match incoming {
        Value::Object(from) => {
            if let Value::Object(into) = existing {
                for (key, value) in from {
                    match into.get_mut(&key) {
                        Some(slot) => merge_checked(slot, value),
                        None => {
                            into.insert(key, value);
                        }
                    }
                }
            }
        }
        incoming => {
            if let Value::Array(items) = existing {
                items.push(incoming);
            } else if existing.is_string() {
                let first = existing.take();
                *existing = Value::Array(vec![first, incoming]);
            }
        }
    }
}

/// The value a field stands for when it is nested inside another field.
pub fn reduce(field: &Field) -> Result<Value, ConflictError> {
    match field {
        Field::Leaf { name } => Ok(Value::String(name.val.clone())),
        Field::DotField { .. } | Field::FieldSet { .. } => {
            let (key, value) = reduce_entry(field)?;
            let mut object = Map::new();
            object.insert(key, value);
            Ok(Value::Object(object))
        }
    }
}

/// The single key/value pair a dotted or grouped field contributes to its enclosing object.
/// A leaf contributes its name with a `null` value.
pub fn reduce_entry(field: &Field) -> Result<(String, Value), ConflictError> {
    match field {
        Field::Leaf { name } => Ok((name.val.clone(), Value::Null)),
        Field::DotField { name, child } => Ok((name.val.clone(), reduce(child)?)),
        Field::FieldSet { name, children } => {
            Ok((name.val.clone(), reduce_field_set(children)?))
        }
    }
}

/// A group of only leaves is the array of their names (`b(c, d)` is `{"b": ["c", "d"]}`). Any
/// other group folds into an object where leaves become `null` members.
pub fn reduce_field_set(children: &[Field]) -> Result<Value, ConflictError> {
    if children.iter().all(Field::is_leaf) {
        return Ok(Value::Array(
            children
                .iter()
                .map(|child| Value::String(child.name().val.clone()))
                .collect(),
        ));
    }

    let mut object = Map::new();
    for child in children {
        if child.is_leaf() {
            object
                .entry(child.name().val.clone())
                .or_insert(Value::Null);
            continue;
        }

        let (key, value) = reduce_entry(child)?;
        if merge_entry(&mut object, key, value).is_err() {
            return Err(ConflictError {
                name: child.name().val.clone(),
                span: child.name().span,
            });
        }
    }
    Ok(Value::Object(object))
}
