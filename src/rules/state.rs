//! Per-kind classification of fields into desired and runtime state.
//!
//! When state preservation is enabled, every path in a kind's table is
//! checked against the configured [`StateMode`] and removed if it belongs to
//! the other half. Paths not listed count as runtime state: they are kept in
//! runtime mode and dropped in desired mode.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::trace;

use crate::document::Document;
use crate::fieldpath::{FieldPath, Removal};
use crate::options::{CleanOptions, StateMode};

/// FieldState classifies a path as user intent or platform output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldState {
    Desired,
    Runtime,
}

use FieldState::{Desired, Runtime};

type Entries = &'static [(&'static str, FieldState)];

/// Entries shared by every kind. Kind tables take precedence.
const COMMON: Entries = &[("metadata.generation", Runtime), ("status", Runtime)];

const DEPLOYMENT: Entries = &[
    ("spec.replicas", Desired),
    ("spec.selector", Desired),
    ("spec.template", Desired),
    ("spec.minReadySeconds", Desired),
    ("spec.strategy", Runtime),
    ("spec.revisionHistoryLimit", Runtime),
    ("spec.progressDeadlineSeconds", Runtime),
];

const STATEFUL_SET: Entries = &[
    ("spec.replicas", Desired),
    ("spec.selector", Desired),
    ("spec.serviceName", Desired),
    ("spec.template", Desired),
    ("spec.volumeClaimTemplates", Desired),
    ("spec.updateStrategy", Runtime),
    ("spec.revisionHistoryLimit", Runtime),
];

const DAEMON_SET: Entries = &[
    ("spec.selector", Desired),
    ("spec.template", Desired),
    ("spec.updateStrategy", Runtime),
    ("spec.revisionHistoryLimit", Runtime),
];

const POD: Entries = &[
    ("spec.containers", Desired),
    ("spec.initContainers", Desired),
    ("spec.volumes", Desired),
    ("spec.restartPolicy", Desired),
    ("spec.nodeName", Runtime),
    ("spec.schedulerName", Runtime),
    ("spec.hostname", Runtime),
    ("spec.subdomain", Runtime),
];

const SERVICE: Entries = &[
    ("spec.ports", Desired),
    ("spec.selector", Desired),
    ("spec.type", Desired),
    ("spec.clusterIP", Desired),
    ("spec.clusterIPs", Desired),
    ("spec.ipFamilies", Desired),
    ("spec.ipFamilyPolicy", Desired),
];

const CONFIG_MAP: Entries = &[("data", Desired), ("binaryData", Desired)];

const SECRET: Entries = &[
    ("data", Desired),
    ("stringData", Desired),
    ("type", Desired),
];

static TABLES: Lazy<HashMap<&'static str, Entries>> = Lazy::new(|| {
    HashMap::from([
        ("Deployment", DEPLOYMENT),
        ("StatefulSet", STATEFUL_SET),
        ("DaemonSet", DAEMON_SET),
        ("Pod", POD),
        ("Service", SERVICE),
        ("ConfigMap", CONFIG_MAP),
        ("Secret", SECRET),
    ])
});

/// StateTable is the classification table for one kind.
#[derive(Debug, Clone, Copy)]
pub struct StateTable {
    entries: Entries,
}

impl StateTable {
    /// Returns the table for `kind`. Unknown kinds only get the common entries.
    pub fn for_kind(kind: &str) -> Self {
        StateTable {
            entries: TABLES.get(kind).copied().unwrap_or(&[]),
        }
    }

    /// Classifies `path`, or `None` if no table lists it.
    pub fn classify(&self, path: &str) -> Option<FieldState> {
        self.entries
            .iter()
            .chain(COMMON)
            .find(|(p, _)| *p == path)
            .map(|(_, state)| *state)
    }

    /// Iterates the kind entries followed by the common entries they do not
    /// override.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, FieldState)> + '_ {
        let own = self.entries.iter().copied();
        let common = COMMON
            .iter()
            .copied()
            .filter(|(p, _)| !self.entries.iter().any(|(own, _)| own == p));
        own.chain(common)
    }
}

/// Returns true when a field classified as `state` is dropped in `mode`.
pub fn is_dropped(state: Option<FieldState>, mode: StateMode) -> bool {
    match (mode, state) {
        (StateMode::Desired, Some(Runtime) | None) => true,
        (StateMode::Runtime, Some(Desired)) => true,
        _ => false,
    }
}

/// Returns true when preservation is enabled and keeps `path` for `kind`.
///
/// Rule sets consult this before their own unconditional removals.
pub fn keeps(kind: &str, path: &str, opts: &CleanOptions) -> bool {
    match opts.preserved_mode() {
        Some(mode) => !is_dropped(StateTable::for_kind(kind).classify(path), mode),
        None => false,
    }
}

/// Removes every listed path that belongs to the half `opts` discards.
///
/// Does nothing unless preservation is enabled.
pub fn apply_state_gate(doc: &mut Document, opts: &CleanOptions) {
    let Some(mode) = opts.preserved_mode() else {
        return;
    };
    let table = StateTable::for_kind(doc.kind());
    let doomed: Vec<FieldPath> = table
        .entries()
        .filter(|(_, state)| is_dropped(Some(*state), mode))
        .map(|(path, _)| FieldPath::parse(path))
        .collect();
    for path in doomed {
        if path.remove(doc.root_mut()) == Removal::Removed {
            trace!(%path, %mode, "removed by state gate");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_kind_and_common() {
        let table = StateTable::for_kind("Deployment");
        assert_eq!(table.classify("spec.replicas"), Some(Desired));
        assert_eq!(table.classify("status"), Some(Runtime));
        assert_eq!(table.classify("spec.paused"), None);

        let unknown = StateTable::for_kind("Widget");
        assert_eq!(unknown.classify("metadata.generation"), Some(Runtime));
        assert_eq!(unknown.classify("spec.replicas"), None);
    }

    #[test]
    fn test_is_dropped() {
        assert!(is_dropped(Some(Runtime), StateMode::Desired));
        assert!(is_dropped(None, StateMode::Desired));
        assert!(!is_dropped(Some(Desired), StateMode::Desired));
        assert!(is_dropped(Some(Desired), StateMode::Runtime));
        assert!(!is_dropped(Some(Runtime), StateMode::Runtime));
        assert!(!is_dropped(None, StateMode::Runtime));
    }

    #[test]
    fn test_keeps_requires_preservation() {
        let off = CleanOptions::default();
        assert!(!keeps("Deployment", "spec.replicas", &off));

        let desired = CleanOptions::default().with_preserved_state(StateMode::Desired);
        assert!(keeps("Deployment", "spec.replicas", &desired));
        assert!(!keeps("Deployment", "spec.strategy", &desired));

        let runtime = CleanOptions::default().with_preserved_state(StateMode::Runtime);
        assert!(!keeps("Deployment", "spec.replicas", &runtime));
        assert!(keeps("Deployment", "spec.strategy", &runtime));
        assert!(keeps("Deployment", "spec.unlisted", &runtime));
    }

    #[test]
    fn test_entries_include_common_once() {
        let entries: Vec<_> = StateTable::for_kind("Pod").entries().collect();
        assert_eq!(entries.iter().filter(|(p, _)| *p == "status").count(), 1);
        assert!(entries.contains(&("spec.nodeName", Runtime)));
    }
}
