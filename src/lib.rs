//! # Kleanup
//!
//! Strips a Kubernetes manifest down to a portable form.
//!
//! Resources exported from a live cluster carry state the cluster assigned:
//! uids, resource versions, scheduling decisions, injected credentials,
//! status. This library removes those fields through a rule set per kind,
//! can optionally keep either the desired or the runtime half of the state,
//! and can turn a ReplicaSet-created Pod back into a Deployment.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON documents
//! - [`document`] - A single resource and its well-known top-level fields
//! - [`fieldpath`] - Dotted field paths and removal
//! - [`prune`] - Recursive removal of empty containers and nulls
//! - [`rules`] - Kind-specific rule sets and the dispatch registry
//! - [`cleaner`] - Per-document entry point
//! - [`stream`] - Multi-document decode/clean/encode pipeline

pub mod cleaner;
pub mod document;
pub mod error;
pub mod fieldpath;
pub mod options;
pub mod prune;
pub mod rules;
pub mod stream;
pub mod value;

pub use cleaner::{CleanOutcome, Cleaner};
pub use document::Document;
pub use error::{CleanupError, Result};
pub use fieldpath::{remove_field, FieldPath, Removal};
pub use options::{CleanOptions, StateMode};
pub use rules::RuleSet;
pub use stream::{clean_str, clean_stream, OutputFormat, StreamSummary};
pub use value::{Map, Value};
