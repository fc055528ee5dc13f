//! Metadata cleanup shared by every kind.

use crate::options::CleanOptions;
use crate::value::Map;

use super::state;

/// Fields the API server assigns; they never survive cleaning.
pub const SERVER_ASSIGNED_FIELDS: &[&str] = &[
    "creationTimestamp",
    "resourceVersion",
    "selfLink",
    "uid",
    "ownerReferences",
    "deletionTimestamp",
    "deletionGracePeriodSeconds",
    "generateName",
];

/// Annotation prefixes owned by deployment, orchestration and GitOps tooling.
pub const ANNOTATION_PREFIXES: &[&str] = &[
    "kubectl.kubernetes.io/",
    "deployment.kubernetes.io/",
    "kubernetes.io/",
    "k8s.io/",
    "control-plane.alpha.kubernetes.io/",
    "app.kubernetes.io/",
    "autoscaling.alpha.kubernetes.io/",
    "batch.kubernetes.io/",
    "helm.sh/",
    "meta.helm.sh/",
    "argocd.argoproj.io/",
    "kustomize.toolkit.fluxcd.io/",
    "helm.toolkit.fluxcd.io/",
];

/// Operational annotation keys matched exactly.
pub const ANNOTATION_KEYS: &[&str] = &[
    "kubernetes.io/change-cause",
    "deployment.kubernetes.io/revision",
    "kubectl.kubernetes.io/last-applied-configuration",
    "pod-template-hash",
    "controller-revision-hash",
    "pod-template-generation",
    "deprecated.daemonset.template.generation",
];

/// Returns true for annotations written by tooling rather than users.
pub fn is_operational_annotation(key: &str) -> bool {
    ANNOTATION_KEYS.contains(&key) || ANNOTATION_PREFIXES.iter().any(|p| key.starts_with(p))
}

/// Cleans a resource's metadata in place.
///
/// An emptied metadata map is left for the pruner to remove.
pub fn clean_metadata(metadata: &mut Map, kind: &str, opts: &CleanOptions) {
    for field in SERVER_ASSIGNED_FIELDS {
        metadata.delete(field);
    }
    if !state::keeps(kind, "metadata.generation", opts) {
        metadata.delete("generation");
    }
    if opts.remove_managed_fields {
        metadata.delete("managedFields");
    }
    if opts.cleanup_finalizers {
        metadata.delete("finalizers");
    }
    if opts.remove_namespace {
        metadata.delete("namespace");
    }

    filter_annotations(metadata, opts);
    filter_labels(metadata, opts);
}

/// Drops operational annotations and those listed in the options. Removes
/// the annotations map when nothing is left.
pub fn filter_annotations(metadata: &mut Map, opts: &CleanOptions) {
    if let Some(annotations) = metadata.get_map_mut("annotations") {
        annotations.retain(|key, _| {
            !is_operational_annotation(key) && !opts.remove_annotations.iter().any(|k| k == key)
        });
    }
    metadata.delete_if_empty("annotations");
}

/// Labels are only filtered by the keys listed in the options.
fn filter_labels(metadata: &mut Map, opts: &CleanOptions) {
    if opts.remove_labels.is_empty() {
        return;
    }
    if let Some(labels) = metadata.get_map_mut("labels") {
        labels.retain(|key, _| !opts.remove_labels.iter().any(|k| k == key));
    }
    metadata.delete_if_empty("labels");
}
