//! Dispatch from a kind string to its rule set.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use crate::document::Document;
use crate::options::CleanOptions;

use super::configmap::clean_config_map;
use super::generic::clean_generic;
use super::pod::clean_pod;
use super::secret::clean_secret;
use super::service::clean_service;
use super::workload::{clean_workload, Workload};

/// RuleSet selects how a resource is cleaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSet {
    Deployment,
    StatefulSet,
    DaemonSet,
    Service,
    Pod,
    ConfigMap,
    Secret,
    Generic,
}

static REGISTRY: Lazy<HashMap<&'static str, RuleSet>> = Lazy::new(|| {
    HashMap::from([
        ("Deployment", RuleSet::Deployment),
        ("StatefulSet", RuleSet::StatefulSet),
        ("DaemonSet", RuleSet::DaemonSet),
        ("Service", RuleSet::Service),
        ("Pod", RuleSet::Pod),
        ("ConfigMap", RuleSet::ConfigMap),
        ("Secret", RuleSet::Secret),
    ])
});

impl RuleSet {
    /// Returns the rule set registered for `kind`, or [`RuleSet::Generic`].
    pub fn for_kind(kind: &str) -> RuleSet {
        REGISTRY.get(kind).copied().unwrap_or(RuleSet::Generic)
    }

    /// Applies the rule set to `doc`.
    pub fn apply(self, doc: &mut Document, opts: &CleanOptions) {
        match self {
            RuleSet::Deployment => clean_workload(doc, Workload::Deployment, opts),
            RuleSet::StatefulSet => clean_workload(doc, Workload::StatefulSet, opts),
            RuleSet::DaemonSet => clean_workload(doc, Workload::DaemonSet, opts),
            RuleSet::Service => clean_service(doc, opts),
            RuleSet::Pod => clean_pod(doc, opts),
            RuleSet::ConfigMap => clean_config_map(doc, opts),
            RuleSet::Secret => clean_secret(doc, opts),
            RuleSet::Generic => clean_generic(doc, opts),
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleSet::Deployment => "deployment",
            RuleSet::StatefulSet => "statefulset",
            RuleSet::DaemonSet => "daemonset",
            RuleSet::Service => "service",
            RuleSet::Pod => "pod",
            RuleSet::ConfigMap => "configmap",
            RuleSet::Secret => "secret",
            RuleSet::Generic => "generic",
        };
        write!(f, "{}", name)
    }
}
