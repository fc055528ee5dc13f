//! Field path module - Addresses fields inside a manifest by dotted path.
//!
//! Paths such as `metadata.generation` or `spec.template.spec.nodeName` are
//! resolved against the document root. A missing segment is never an error.

mod path;

pub use path::*;
