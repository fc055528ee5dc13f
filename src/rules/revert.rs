//! Reconstructs a Deployment from a pod that a ReplicaSet created.
//!
//! A pod stamped with a `pod-template-hash` label came from a Deployment's
//! ReplicaSet. Given only the pod, the closest portable resource is a
//! single-replica Deployment whose template is the pod's own spec.

use tracing::info;

use crate::document::{Document, DATA, METADATA, SPEC, STATUS, STRING_DATA, TYPE};
use crate::value::{Map, Value};

pub const TEMPLATE_HASH_LABEL: &str = "pod-template-hash";
pub const APPS_V1: &str = "apps/v1";
pub const DEPLOYMENT: &str = "Deployment";

/// Label used as the selector when the pod had no other labels.
const FALLBACK_LABEL: &str = "app";

/// Reversion is the outcome of [`revert_to_deployment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reversion {
    /// The document is now a Deployment with the given name.
    Reverted { name: String },
    /// The pod lacked a template hash; the document is unchanged.
    NotReverted,
}

/// Rewrites `doc` in place from a Pod into a Deployment.
///
/// Requires a non-empty `pod-template-hash` label. Without it the document
/// stays a Pod.
pub fn revert_to_deployment(doc: &mut Document) -> Reversion {
    let Some(metadata) = doc.metadata() else {
        return Reversion::NotReverted;
    };
    let pod_name = metadata.get_str("name").unwrap_or_default().to_string();

    let hash = metadata
        .get_map("labels")
        .and_then(|labels| labels.get_str(TEMPLATE_HASH_LABEL))
        .filter(|hash| !hash.is_empty());
    let Some(hash) = hash else {
        info!(pod = %pod_name, "pod has no {} label, leaving it as a Pod", TEMPLATE_HASH_LABEL);
        return Reversion::NotReverted;
    };

    let name = base_name(&pod_name, hash).unwrap_or_else(|| {
        let original = if pod_name.is_empty() { "pod" } else { &pod_name };
        format!("{original}-reverted")
    });

    let mut labels: Map = metadata
        .get_map("labels")
        .into_iter()
        .flat_map(Map::iter)
        .filter(|(key, _)| key.as_str() != TEMPLATE_HASH_LABEL)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if labels.is_empty() {
        labels.set(FALLBACK_LABEL, name.clone());
    }
    let namespace = metadata.get_str("namespace").map(str::to_string);

    let pod_spec = doc.clear(SPEC).unwrap_or_else(|| Value::Map(Map::new()));

    let mut new_metadata = Map::new();
    new_metadata.set("name", name.clone());
    new_metadata.set("labels", labels.clone());
    if let Some(namespace) = namespace {
        new_metadata.set("namespace", namespace);
    }

    let mut selector = Map::new();
    selector.set("matchLabels", labels.clone());

    let mut template_metadata = Map::new();
    template_metadata.set("labels", labels);

    let mut template = Map::new();
    template.set("metadata", template_metadata);
    template.set("spec", pod_spec);

    let mut spec = Map::new();
    spec.set("replicas", 1i64);
    spec.set("selector", selector);
    spec.set("template", template);

    doc.set_kind(DEPLOYMENT);
    doc.set_api_version(APPS_V1);
    doc.set(METADATA, new_metadata);
    doc.set(SPEC, spec);
    for field in [STATUS, DATA, STRING_DATA, TYPE] {
        doc.clear(field);
    }

    info!(pod = %pod_name, deployment = %name, "reverted pod to its controlling Deployment");
    Reversion::Reverted { name }
}

/// Strips `-<hash>-<suffix>` or a trailing `-<hash>` from a pod name.
///
/// Returns `None` when neither pattern matches or nothing would be left.
pub fn base_name(pod_name: &str, hash: &str) -> Option<String> {
    let infix = format!("-{hash}-");
    let base = match pod_name.rfind(&infix) {
        Some(idx) => &pod_name[..idx],
        None => pod_name.strip_suffix(&format!("-{hash}"))?,
    };
    (!base.is_empty()).then(|| base.to_string())
}
