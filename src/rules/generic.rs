//! Generic cleaning applied to every resource before kind-specific rules.

use crate::document::{Document, STATUS};
use crate::options::CleanOptions;
use crate::prune::prune_in_place;

use super::{metadata, state};

/// Runs the state gate, metadata cleanup, status removal and pruning, in
/// that order.
pub fn clean_generic(doc: &mut Document, opts: &CleanOptions) {
    let kind = doc.kind().to_string();

    state::apply_state_gate(doc, opts);

    if let Some(meta) = doc.metadata_mut() {
        metadata::clean_metadata(meta, &kind, opts);
    }

    if opts.remove_status && !state::keeps(&kind, STATUS, opts) {
        doc.clear(STATUS);
    }

    if opts.remove_empty {
        prune_in_place(doc.root_mut());
    }
}
