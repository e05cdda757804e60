//! `valuable` view of the structured form.
//!
//! `tracing` records a [`Tree`] field as a nested value (object, arrays,
//! scalars) when built with `--cfg tracing_unstable`:
//!
//! ```text
//! let tree = err.to_tree();
//! tracing::error!(err = tracing::field::valuable(&tree), "request failed");
//! ```

use serde_json::Value as Json;
use valuable::{Listable, Mappable, Valuable, Value, Visit};

use crate::Error;

/// Owned structured form of a record, visitable through `valuable`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree(Json);

impl Tree {
    /// The structured form this tree was built from.
    pub fn as_json(&self) -> &Json {
        &self.0
    }
}

impl Error {
    /// Structured form as a [`Tree`], for `valuable`-aware log sinks.
    pub fn to_tree(&self) -> Tree {
        Tree(self.to_structured())
    }
}

/// Borrowed node inside a tree.
struct Node<'a>(&'a Json);

fn value_of<'a, T>(json: &'a Json, this: &'a T) -> Value<'a>
where
    T: Listable + Mappable,
{
    match json {
        Json::Null => Value::Unit,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(u) = n.as_u64() {
                Value::U64(u)
            } else if let Some(i) = n.as_i64() {
                Value::I64(i)
            } else {
                n.as_f64().map_or(Value::Unit, Value::F64)
            }
        }
        Json::String(s) => Value::String(s),
        Json::Array(_) => Value::Listable(this),
        Json::Object(_) => Value::Mappable(this),
    }
}

fn visit_json(json: &Json, visit: &mut dyn Visit) {
    match json {
        Json::Array(items) => {
            for item in items {
                visit.visit_value(Node(item).as_value());
            }
        }
        Json::Object(map) => {
            for (key, item) in map {
                visit.visit_entry(Value::String(key), Node(item).as_value());
            }
        }
        scalar => visit.visit_value(Node(scalar).as_value()),
    }
}

fn len_of(json: &Json) -> (usize, Option<usize>) {
    let len = match json {
        Json::Array(items) => items.len(),
        Json::Object(map) => map.len(),
        _ => 0,
    };
    (len, Some(len))
}

impl Valuable for Node<'_> {
    fn as_value(&self) -> Value<'_> {
        value_of(self.0, self)
    }

    fn visit(&self, visit: &mut dyn Visit) {
        visit_json(self.0, visit);
    }
}

impl Listable for Node<'_> {
    fn size_hint(&self) -> (usize, Option<usize>) {
        len_of(self.0)
    }
}

impl Mappable for Node<'_> {
    fn size_hint(&self) -> (usize, Option<usize>) {
        len_of(self.0)
    }
}

impl Valuable for Tree {
    fn as_value(&self) -> Value<'_> {
        value_of(&self.0, self)
    }

    fn visit(&self, visit: &mut dyn Visit) {
        visit_json(&self.0, visit);
    }
}

impl Listable for Tree {
    fn size_hint(&self) -> (usize, Option<usize>) {
        len_of(&self.0)
    }
}

impl Mappable for Tree {
    fn size_hint(&self) -> (usize, Option<usize>) {
        len_of(&self.0)
    }
}
