//! Structural pruning of empty containers and null values.
//!
//! Field deletion leaves husks behind: a `metadata` with nothing in it, a
//! `ports` list whose only entry lost every field. The pruner walks a value
//! bottom-up and collapses those to [`Value::Null`], which parents then drop.

use crate::value::{Map, Value};

/// Prunes `value` and returns what is left of it.
///
/// Maps keep only keys whose pruned value is not null; an empty string is a
/// deliberate value and survives. Lists drop elements that prune to null.
/// A map or list that ends up empty becomes [`Value::Null`]. Scalars pass
/// through unchanged.
pub fn prune(value: Value) -> Value {
    match value {
        Value::Map(map) => match prune_map(map) {
            Some(map) => Value::Map(map),
            None => Value::Null,
        },
        Value::List(items) => {
            let kept: Vec<Value> = items
                .into_iter()
                .map(prune)
                .filter(|v| !v.is_null())
                .collect();
            if kept.is_empty() {
                Value::Null
            } else {
                Value::List(kept)
            }
        }
        scalar => scalar,
    }
}

/// Prunes every entry of `map`, returning `None` when no key survives.
pub fn prune_map(map: Map) -> Option<Map> {
    let pruned: Map = map
        .into_iter()
        .map(|(k, v)| (k, prune(v)))
        .filter(|(_, v)| !v.is_null())
        .collect();
    if pruned.is_empty() {
        None
    } else {
        Some(pruned)
    }
}

/// Prunes the children of `map` in place. The map itself is kept even when
/// it ends up empty; callers decide whether to drop it.
pub fn prune_in_place(map: &mut Map) {
    let taken = std::mem::take(map);
    if let Some(pruned) = prune_map(taken) {
        *map = pruned;
    }
}

/// Prunes the map stored under `key` in `parent`, removing the key when
/// nothing survives.
pub fn prune_entry(parent: &mut Map, key: &str) {
    let Some(value) = parent.delete(key) else {
        return;
    };
    let pruned = prune(value);
    if !pruned.is_null() {
        parent.set(key, pruned);
    }
}
