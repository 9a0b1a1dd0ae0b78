//! Ordered prefix trees of key segments, and their two textual renderings.

use indexmap::IndexMap;
use serde_json::Value;

/// A node of the prefix tree built from one JSON value. Children keep the order in which their
/// segment was first inserted, which is also the order they are rendered in. A node without
/// children is a leaf segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTree {
    children: IndexMap<String, PathTree>,
}

impl PathTree {
    /// Builds the tree of every key path in `value`. Arrays do not add a segment of their own:
    /// their items all hang off the array's own prefix.
    pub fn from_value(value: &Value) -> Self {
        let mut tree = PathTree::default();
        let mut prefix = Vec::new();
        tree.collect(value, &mut prefix);
        tree
    }

    fn collect<'v>(&mut self, value: &'v Value, prefix: &mut Vec<&'v str>) {
        match value {
            Value::Object(members) => {
                for (key, member) in members {
                    prefix.push(key);
                    self.collect_member(member, prefix);
                    prefix.pop();
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.collect_member(item, prefix);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                self.collect_member(value, prefix)
            }
        }
    }

    /// Handles one value sitting at the end of `prefix`: containers recurse, null marks the
    /// prefix itself as a path, and scalars add their text as the last segment.
    fn collect_member<'v>(&mut self, value: &'v Value, prefix: &mut Vec<&'v str>) {
        match value {
            Value::Object(_) | Value::Array(_) => self.collect(value, prefix),
            Value::Null => self.insert(prefix.iter().copied()),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                let text = scalar_text(value);
                self.insert(prefix.iter().copied().chain([text.as_str()]));
            }
        }
    }

    /// Inserts one path, reusing whatever prefix of it already exists. The empty path is a no-op.
    pub fn insert<'s>(&mut self, path: impl IntoIterator<Item = &'s str>) {
        let mut node = self;
        for segment in path {
            node = node.children.entry(segment.to_owned()).or_default();
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Every root-to-leaf path, depth first.
    pub fn leaf_paths(&self) -> Vec<Vec<&str>> {
        let mut paths = Vec::new();
        let mut prefix = Vec::new();
        self.walk_leaves(&mut prefix, &mut paths);
        paths
    }

    fn walk_leaves<'t>(&'t self, prefix: &mut Vec<&'t str>, paths: &mut Vec<Vec<&'t str>>) {
        for (segment, child) in &self.children {
            prefix.push(segment);
            if child.is_leaf() {
                paths.push(prefix.clone());
            } else {
                child.walk_leaves(prefix, paths);
            }
            prefix.pop();
        }
    }

    /// Renders the tree in grouped notation: single-child chains collapse into `a.b.c`, and
    /// nodes with several children list them as `a(b, c)`.
    pub fn grouped(&self) -> String {
        let mut out = String::new();
        for (i, (name, child)) in self.children.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            child.write_grouped(name, &mut out);
        }
        out
    }

    fn write_grouped(&self, name: &str, out: &mut String) {
        out.push_str(name);
        match self.children.first() {
            None => {}
            Some((child_name, child)) if self.children.len() == 1 => {
                out.push('.');
                child.write_grouped(child_name, out);
            }
            Some(_) => {
                out.push('(');
                for (i, (child_name, child)) in self.children.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    child.write_grouped(child_name, out);
                }
                out.push(')');
            }
        }
    }

    /// Renders every leaf as its fully qualified dot path.
    pub fn dot_paths(&self) -> String {
        self.leaf_paths()
            .iter()
            .map(|path| path.join("."))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The text a scalar contributes as a path segment. Floats that hold an integer are written
/// without a fractional part, so `1.0` and `1` flatten the same way.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                if f == 0.0 {
                    "0".to_string()
                } else {
                    format!("{f:.0}")
                }
            }
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
    }
}
