//! Dotted field paths and removal.

use crate::value::Map;
use std::fmt;

/// FieldPath is a dot-separated address of a field, e.g. `spec.replicas`.
///
/// Segments are plain map keys; list indices are not addressable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

/// Outcome of a removal. Absence of the target is a no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The addressed field existed and was deleted.
    Removed,
    /// Some segment was missing or not a map; nothing changed.
    Absent,
}

impl FieldPath {
    /// Parses a dotted path. Empty segments are dropped.
    pub fn parse(path: &str) -> Self {
        FieldPath {
            segments: path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walks every segment but the last, requiring each to be a map.
    fn parent_mut<'a>(&self, root: &'a mut Map) -> Option<&'a mut Map> {
        let (_, parents) = self.segments.split_last()?;
        let mut current = root;
        for segment in parents {
            current = current.get_map_mut(segment)?;
        }
        Some(current)
    }

    /// Deletes the addressed field from `root`.
    ///
    /// A single-segment path clears the top-level field entirely. Longer
    /// paths walk intermediate maps and delete the final key from whichever
    /// map they land in. Any missing or non-map intermediate segment makes
    /// the call a no-op.
    pub fn remove(&self, root: &mut Map) -> Removal {
        let Some(last) = self.segments.last() else {
            return Removal::Absent;
        };
        match self.parent_mut(root).and_then(|parent| parent.delete(last)) {
            Some(_) => Removal::Removed,
            None => Removal::Absent,
        }
    }

}

/// Convenience wrapper around [`FieldPath::parse`] and [`FieldPath::remove`].
pub fn remove_field(root: &mut Map, path: &str) -> Removal {
    FieldPath::parse(path).remove(root)
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath::parse(path)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
