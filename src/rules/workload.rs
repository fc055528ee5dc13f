//! Deployment, StatefulSet and DaemonSet rules.

use crate::document::{Document, SPEC};
use crate::options::CleanOptions;
use crate::prune::prune_entry;
use crate::value::{Map, Value};

use super::pod::clean_pod_spec;
use super::{generic, metadata, state};

/// Workload is one of the pod-template controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workload {
    Deployment,
    StatefulSet,
    DaemonSet,
}

impl Workload {
    pub fn kind(self) -> &'static str {
        match self {
            Workload::Deployment => "Deployment",
            Workload::StatefulSet => "StatefulSet",
            Workload::DaemonSet => "DaemonSet",
        }
    }

    /// Controller bookkeeping fields under `spec`.
    fn bookkeeping_fields(self) -> &'static [&'static str] {
        match self {
            Workload::Deployment => &[
                "replicas",
                "revisionHistoryLimit",
                "progressDeadlineSeconds",
                "strategy",
            ],
            Workload::StatefulSet => &["replicas", "revisionHistoryLimit", "updateStrategy"],
            Workload::DaemonSet => &["revisionHistoryLimit", "updateStrategy"],
        }
    }
}

/// Cleans a workload: generic rules, bookkeeping fields, then the pod template.
pub fn clean_workload(doc: &mut Document, workload: Workload, opts: &CleanOptions) {
    generic::clean_generic(doc, opts);

    let kind = workload.kind();
    if let Some(spec) = doc.spec_mut() {
        for field in workload.bookkeeping_fields() {
            if !state::keeps(kind, &format!("spec.{field}"), opts) {
                spec.delete(field);
            }
        }
        if workload == Workload::Deployment && spec.get("paused") == Some(&Value::Bool(false)) {
            spec.delete("paused");
        }

        if let Some(template) = spec.get_map_mut("template") {
            clean_pod_template(template, kind, "spec.template", opts);
        }
        spec.delete_if_empty("template");

        if workload == Workload::StatefulSet {
            clean_volume_claim_templates(spec);
        }
    }

    if opts.remove_empty {
        prune_entry(doc.root_mut(), SPEC);
    }
}

/// Cleans a pod template found at `path` inside a resource of `kind`.
pub fn clean_pod_template(template: &mut Map, kind: &str, path: &str, opts: &CleanOptions) {
    if let Some(meta) = template.get_map_mut("metadata") {
        meta.delete("creationTimestamp");
        metadata::filter_annotations(meta, opts);
    }
    template.delete_if_empty("metadata");

    if let Some(spec) = template.get_map_mut("spec") {
        clean_pod_spec(spec, kind, &format!("{path}.spec"), opts);
    }
    template.delete_if_empty("spec");
}

/// Claim templates come back from the API server with a creation timestamp
/// and a pending status.
fn clean_volume_claim_templates(spec: &mut Map) {
    let Some(claims) = spec.get_list_mut("volumeClaimTemplates") else {
        return;
    };
    for claim in claims.iter_mut().filter_map(Value::as_map_mut) {
        if let Some(meta) = claim.get_map_mut("metadata") {
            meta.delete("creationTimestamp");
        }
        claim.delete_if_empty("metadata");
        claim.delete("status");
    }
}
