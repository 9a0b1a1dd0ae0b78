//! Reversible conversion between JSON arrays and dot notation.
//!
//! Each element of a JSON array becomes a list of key paths such as `a.b.c`. In grouped notation,
//! paths that share a prefix are written once with their remainders in parentheses:
//!
//! ```
//! let notation = dotnote::flatten(r#"[{"a": {"b": ["c", "d"]}}, "e"]"#).unwrap();
//! assert_eq!(notation, "a.b(c, d), e");
//!
//! let json = dotnote::unflatten(&notation).unwrap();
//! assert_eq!(json, r#"[{"a":{"b":["c","d"]}},"e"]"#);
//! ```
//!
//! Scalars turn into plain text on the way in, so numbers and booleans come back as strings.
//! On the way out, consecutive objects whose keys merge cleanly end up in a single element.

use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

pub mod accumulate;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod path_tree;
pub mod reduce;
pub mod spanned;

pub use accumulate::accumulate;
pub use error::{ConflictError, Error, Found, GrammarError};
pub use lexer::{tokenize, Token};
pub use parser::{parse_fields, Field};
pub use path_tree::PathTree;
pub use spanned::Spanned;

/// How [`flatten_with`] writes paths that share a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Notation {
    /// `a(b, c.d)`
    #[default]
    Grouped,
    /// `a.b, a.c.d`
    DotOnly,
}

/// Flattens a JSON array into grouped notation.
pub fn flatten(json: &str) -> Result<String, Error> {
    flatten_with(json, Notation::Grouped)
}

/// Flattens a JSON array into one fully qualified dot path per leaf.
pub fn flatten_dot_only(json: &str) -> Result<String, Error> {
    flatten_with(json, Notation::DotOnly)
}

/// Flattens a JSON array in the given notation. Fails with [`Error::MalformedJson`] for text that
/// is not JSON, [`Error::JsonTooDeep`] for JSON nested past `serde_json`'s limit and
/// [`Error::NotAnArray`] when the top-level value is not an array.
#[instrument(level = "debug", skip(json), fields(len = json.len()))]
pub fn flatten_with(json: &str, notation: Notation) -> Result<String, Error> {
    let value: Value = serde_json::from_str(json)?;
    flatten_value(&value, notation)
}

/// Flattens an already parsed value, which must be an array. Elements are rendered one at a
/// time and joined with `", "`; elements without any path (`{}`, `[]`) contribute nothing.
pub fn flatten_value(value: &Value, notation: Notation) -> Result<String, Error> {
    let Value::Array(elements) = value else {
        return Err(Error::NotAnArray {
            found: kind_desc(value),
        });
    };

    let rendered: Vec<String> = elements
        .iter()
        .map(|element| match element {
            Value::Object(_) | Value::Array(_) => {
                let tree = PathTree::from_value(element);
                match notation {
                    Notation::Grouped => tree.grouped(),
                    Notation::DotOnly => tree.dot_paths(),
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                path_tree::scalar_text(element)
            }
        })
        .filter(|text| !text.is_empty())
        .collect();

    Ok(rendered.join(", "))
}

/// Parses notation and rebuilds the JSON array it denotes, as compact JSON text.
pub fn unflatten(notation: &str) -> Result<String, Error> {
    let elements = unflatten_values(notation)?;
    Ok(Value::Array(elements).to_string())
}

/// Like [`unflatten`], but hands back the rebuilt elements instead of JSON text.
#[instrument(level = "debug", skip(notation), fields(len = notation.len()))]
pub fn unflatten_values(notation: &str) -> Result<Vec<Value>, Error> {
    let fields = parse_fields(notation)?;
    Ok(accumulate(&fields)?)
}

fn kind_desc(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_scalars() {
        assert_eq!(flatten(r#"["A"]"#).unwrap(), "A");
        assert_eq!(flatten("[42]").unwrap(), "42");
        assert_eq!(flatten("[true, false]").unwrap(), "true, false");
        assert_eq!(flatten("[null]").unwrap(), "null");
    }

    #[test]
    fn test_flatten_mixed_elements() {
        assert_eq!(flatten(r#"["A", {"B": "C"}]"#).unwrap(), "A, B.C");
        assert_eq!(flatten(r#"["X", {"A": "B"}, "Y"]"#).unwrap(), "X, A.B, Y");
        assert_eq!(flatten(r#"[{"A": {"B": "C"}}, {"D": "E"}]"#).unwrap(), "A.B.C, D.E");
    }

    #[test]
    fn test_notations_differ_only_in_grouping() {
        let json = r#"[{"A": {"B": {"X": {"P": null, "Q": null}, "Y": null}, "C": {"Z": null}}}]"#;
        assert_eq!(flatten(json).unwrap(), "A(B(X(P, Q), Y), C.Z)");
        assert_eq!(flatten_dot_only(json).unwrap(), "A.B.X.P, A.B.X.Q, A.B.Y, A.C.Z");
    }

    #[test]
    fn test_empty_elements_are_skipped() {
        assert_eq!(flatten(r#"["a", {}, [], "b"]"#).unwrap(), "a, b");
        assert_eq!(flatten("[]").unwrap(), "");
    }

    #[test]
    fn test_empty_string_elements_are_skipped() {
        assert_eq!(flatten(r#"["a", "", "b"]"#).unwrap(), "a, b");
        assert_eq!(flatten_dot_only(r#"["", "a"]"#).unwrap(), "a");
        assert_eq!(flatten(r#"[""]"#).unwrap(), "");
    }

    #[test]
    fn test_json_nested_past_the_recursion_limit() {
        let json = format!("{}{}", "[".repeat(200), "]".repeat(200));
        assert!(matches!(flatten(&json), Err(Error::JsonTooDeep(_))));

        let range = flatten(&json).unwrap_err().source_range(&json);
        assert!(range.start < range.end && range.end <= json.len());
    }

    #[test]
    fn test_flatten_errors() {
        assert!(matches!(flatten("not json"), Err(Error::MalformedJson(_))));
        assert!(matches!(
            flatten(r#"{"a": 1}"#),
            Err(Error::NotAnArray { found: "object" })
        ));
        assert!(matches!(
            flatten_dot_only("\"s\""),
            Err(Error::NotAnArray { found: "string" })
        ));
    }

    #[test]
    fn test_unflatten_basics() {
        assert_eq!(unflatten("").unwrap(), "[]");
        assert_eq!(unflatten("a").unwrap(), r#"["a"]"#);
        assert_eq!(unflatten("b.c.d").unwrap(), r#"[{"b":{"c":"d"}}]"#);
    }

    #[test]
    fn test_unflatten_keeps_key_order() {
        assert_eq!(
            unflatten("z.1, a.2, m.3").unwrap(),
            r#"[{"z":"1","a":"2","m":"3"}]"#
        );
    }

    #[test]
    fn test_unflatten_errors() {
        assert!(matches!(unflatten("a(b"), Err(Error::Grammar(_))));
        assert!(matches!(unflatten("a(b, b.c)"), Err(Error::Conflict(_))));
    }
}
