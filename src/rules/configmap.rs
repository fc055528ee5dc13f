//! ConfigMap rules.

use crate::document::{Document, DATA};
use crate::options::CleanOptions;
use crate::prune::prune_entry;
use crate::value::Value;

use super::generic;

/// Marker left behind when `kubectl apply` state leaks into a data entry.
pub const LAST_APPLIED_MARKER: &str = "kubectl.kubernetes.io/last-applied-configuration";

pub fn clean_config_map(doc: &mut Document, opts: &CleanOptions) {
    generic::clean_generic(doc, opts);

    if let Some(data) = doc.data_mut() {
        data.retain(|key, value| !is_last_applied_entry(key, value));
    }
    if opts.remove_empty {
        prune_entry(doc.root_mut(), DATA);
    }
}

fn is_last_applied_entry(key: &str, value: &Value) -> bool {
    key.contains(LAST_APPLIED_MARKER)
        || value
            .as_str()
            .is_some_and(|v| v.contains(LAST_APPLIED_MARKER))
}
