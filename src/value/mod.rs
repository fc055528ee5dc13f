//! Value module - In-memory representation of YAML/JSON manifests.
//!
//! Every cleaning rule operates on this closed set of variants instead of
//! inspecting types at runtime.

mod value;

pub use value::*;
