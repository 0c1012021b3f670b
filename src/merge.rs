//! Deep merge of manifest trees
//!
//! Manifests are plain `serde_json::Value` trees. This module merges an
//! ordered sequence of them into one tree:
//!
//! - Array elements are positional entries. By default they are appended to
//!   the result, so lists coming from several inputs are concatenated.
//! - Keyed entries overwrite earlier ones, except when both the existing and
//!   the incoming value are containers (objects or arrays), in which case the
//!   two are merged recursively.
//!
//! When positional and keyed entries end up in the same result, the result is
//! an object and positional entries take the next free integer key, rendered
//! as a string. Empty inputs contribute no entries, so they never change the
//! shape of the result.
//!
//! ## Example
//!
//! ```
//! use composer_expand::merge::merge_deep;
//! use serde_json::json;
//!
//! let defaults = json!({"require-dev": {"drush/drush": "^12"}, "keywords": ["ci"]});
//! let project = json!({"require-dev": {"drupal/token": "^1"}, "keywords": ["module"]});
//!
//! let merged = merge_deep([&defaults, &project]);
//! assert_eq!(merged["require-dev"]["drush/drush"], "^12");
//! assert_eq!(merged["require-dev"]["drupal/token"], "^1");
//! assert_eq!(merged["keywords"], json!(["ci", "module"]));
//! ```

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Merge manifest trees, appending array elements.
///
/// Equivalent to [`merge_deep_array`] with `preserve_integer_keys` unset.
pub fn merge_deep<'a, I>(values: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    merge_deep_array(values, false)
}

/// Merge manifest trees in order, later trees winning on collisions.
///
/// Inputs are never modified. Scalar and null inputs contribute nothing.
///
/// # Arguments
///
/// * `values` - The trees to merge, lowest priority first
/// * `preserve_integer_keys` - If true, the element at index `i` of an array
///   collides with the result's entry at position `i` instead of being appended
///
/// # Returns
///
/// An object as soon as any keyed entry was merged, otherwise an array when at
/// least one input was an array, and an empty object when nothing was merged.
pub fn merge_deep_array<'a, I>(values: I, preserve_integer_keys: bool) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut merged = Merged::Empty;

    for value in values {
        match value {
            Value::Array(items) => {
                if matches!(merged, Merged::Empty) {
                    merged = Merged::List(Vec::new());
                }
                for (index, item) in items.iter().enumerate() {
                    if preserve_integer_keys {
                        merged.insert_at(index, item);
                    } else {
                        merged.append(item.clone());
                    }
                }
            }
            Value::Object(entries) => {
                for (key, item) in entries {
                    merged.insert(key, item, preserve_integer_keys);
                }
            }
            _ => {}
        }
    }

    merged.into_value()
}

/// Whether a value takes part in recursive merging.
fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// The result under construction.
enum Merged {
    Empty,
    List(Vec<Value>),
    Map {
        entries: Map<String, Value>,
        next_index: usize,
    },
}

impl Merged {
    /// Positional storage, for results that hold no keys yet.
    fn listed(&mut self) -> &mut Vec<Value> {
        if matches!(self, Merged::Empty) {
            *self = Merged::List(Vec::new());
        }
        match self {
            Merged::List(items) => items,
            _ => unreachable!("listed() is only called while the result holds no keys"),
        }
    }

    /// Switch the result to keyed storage, renumbering positional entries.
    fn keyed(&mut self) -> &mut Map<String, Value> {
        if !matches!(self, Merged::Map { .. }) {
            let items = match std::mem::replace(self, Merged::Empty) {
                Merged::List(items) => items,
                _ => Vec::new(),
            };
            let next_index = items.len();
            let entries = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect();
            *self = Merged::Map {
                entries,
                next_index,
            };
        }
        match self {
            Merged::Map { entries, .. } => entries,
            _ => unreachable!("result was just switched to keyed storage"),
        }
    }

    fn append(&mut self, value: Value) {
        if let Merged::Map {
            entries,
            next_index,
        } = self
        {
            while entries.contains_key(&next_index.to_string()) {
                *next_index += 1;
            }
            entries.insert(next_index.to_string(), value);
            *next_index += 1;
            return;
        }
        self.listed().push(value);
    }

    /// Store a positional entry at its own index.
    fn insert_at(&mut self, index: usize, value: &Value) {
        if let Merged::Map { next_index, .. } = self {
            *next_index = (*next_index).max(index + 1);
            self.insert(&index.to_string(), value, true);
            return;
        }

        let items = self.listed();
        match items.get_mut(index) {
            Some(slot) if is_container(slot) && is_container(value) => {
                let merged = merge_deep_array([&*slot, value], true);
                *slot = merged;
            }
            Some(slot) => *slot = value.clone(),
            None => items.push(value.clone()),
        }
    }

    fn insert(&mut self, key: &str, value: &Value, preserve_integer_keys: bool) {
        let entries = self.keyed();
        if is_container(value) {
            if let Some(slot) = entries.get_mut(key).filter(|slot| is_container(slot)) {
                let merged = merge_deep_array([&*slot, value], preserve_integer_keys);
                *slot = merged;
                return;
            }
        }
        entries.insert(key.to_string(), value.clone());
    }

    fn into_value(self) -> Value {
        match self {
            Merged::Empty => Value::Object(Map::new()),
            Merged::List(items) => Value::Array(items),
            Merged::Map { entries, .. } => Value::Object(entries),
        }
    }
}

/// Navigate to an object nested at `path`, creating missing or null levels.
///
/// # Errors
///
/// Returns `Error::Manifest` if a level exists but is not an object.
pub fn navigate_object<'a>(
    value: &'a mut Value,
    path: &[&str],
) -> Result<&'a mut Map<String, Value>> {
    let mut current = value;
    for key in path {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        let Some(map) = current.as_object_mut() else {
            return Err(Error::Manifest {
                message: format!("Expected object while navigating to '{}'", key),
            });
        };
        current = map
            .entry(key.to_string())
            .or_insert(Value::Object(Map::new()));
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    current
        .as_object_mut()
        .ok_or_else(|| Error::Manifest {
            message: format!("Expected object at '{}'", path.join(".")),
        })
}
