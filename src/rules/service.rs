//! Service rules.

use crate::document::{Document, SPEC};
use crate::options::CleanOptions;
use crate::prune::prune_entry;

use super::pod::clean_ports;
use super::{generic, state};

pub const SERVICE: &str = "Service";

/// Networking fields the control plane allocates.
const CLUSTER_ASSIGNED_FIELDS: &[&str] =
    &["clusterIP", "clusterIPs", "ipFamilies", "ipFamilyPolicy"];

/// Spec fields paired with the value the API server defaults them to.
const DEFAULTED_FIELDS: &[(&str, &str)] = &[
    ("sessionAffinity", "None"),
    ("internalTrafficPolicy", "Cluster"),
];

/// A headless service asks for `clusterIP: None` explicitly.
const HEADLESS: &str = "None";

pub fn clean_service(doc: &mut Document, opts: &CleanOptions) {
    generic::clean_generic(doc, opts);

    let Some(spec) = doc.spec_mut() else {
        return;
    };

    let headless = spec.get_str("clusterIP") == Some(HEADLESS);
    for field in CLUSTER_ASSIGNED_FIELDS {
        if headless && *field == "clusterIP" {
            continue;
        }
        if !state::keeps(SERVICE, &format!("spec.{field}"), opts) {
            spec.delete(field);
        }
    }

    for (field, default) in DEFAULTED_FIELDS {
        if spec.get_str(field) == Some(*default)
            && !state::keeps(SERVICE, &format!("spec.{field}"), opts)
        {
            spec.delete(field);
        }
    }

    clean_ports(spec);

    if opts.remove_empty {
        prune_entry(doc.root_mut(), SPEC);
    }
}
