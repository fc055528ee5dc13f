//! Rules module - Kind-specific cleaning rule sets.
//!
//! Every rule set runs the generic rules first (state gate, metadata, status,
//! pruning) and then its own deletions. Kinds without a dedicated rule set
//! fall back to the generic one.

mod configmap;
mod generic;
mod metadata;
mod pod;
mod registry;
mod revert;
mod secret;
mod service;
mod state;
mod workload;


pub use configmap::*;
pub use generic::*;
pub use metadata::*;
pub use pod::*;
pub use registry::*;
pub use revert::*;
pub use secret::*;
pub use service::*;
pub use state::*;
pub use workload::*;
