//! Pod, pod spec, container and volume rules.

use std::collections::BTreeSet;

use crate::document::{Document, SPEC};
use crate::options::CleanOptions;
use crate::prune::prune_entry;
use crate::value::{Map, Value};

use super::revert::{revert_to_deployment, Reversion};
use super::workload::{clean_workload, Workload};
use super::{generic, state};

pub const POD: &str = "Pod";

/// Pod spec fields filled in by the scheduler, kubelet or admission chain.
const RUNTIME_POD_FIELDS: &[&str] = &[
    "nodeName",
    "schedulerName",
    "podIP",
    "podIPs",
    "hostNetwork",
    "hostPID",
    "hostIPC",
    "hostname",
    "subdomain",
    "terminationGracePeriodSeconds",
    "dnsPolicy",
    "serviceAccount",
    "enableServiceLinks",
    "preemptionPolicy",
    "priority",
];

/// Tolerations the DefaultTolerationSeconds admission plugin adds to every pod.
const INJECTED_TOLERATION_KEYS: &[&str] = &[
    "node.kubernetes.io/not-ready",
    "node.kubernetes.io/unreachable",
];

/// Container fields that only carry platform defaults.
const DEFAULTED_CONTAINER_FIELDS: &[&str] = &["terminationMessagePath", "terminationMessagePolicy"];

/// Boolean container flags that are dropped when false.
const DEFAULT_FALSE_CONTAINER_FLAGS: &[&str] = &["tty", "stdin", "stdinOnce"];

/// Volume name prefixes used for injected service account credentials.
pub const INJECTED_VOLUME_PREFIXES: &[&str] = &["kube-api-access-", "default-token-"];

/// Every list in a pod spec whose entries carry `volumeMounts`.
const MOUNTING_CONTAINER_LISTS: &[&str] = &["containers", "initContainers", "ephemeralContainers"];

pub const DEFAULT_PROTOCOL: &str = "TCP";

/// Cleans a Pod and, when enabled, turns an orphaned ReplicaSet pod back
/// into a Deployment.
pub fn clean_pod(doc: &mut Document, opts: &CleanOptions) {
    generic::clean_generic(doc, opts);

    if let Some(spec) = doc.spec_mut() {
        clean_pod_spec(spec, POD, SPEC, opts);
    }
    if opts.remove_empty {
        prune_entry(doc.root_mut(), SPEC);
    }

    if opts.revert_pod_to_controller && doc.metadata().is_some() {
        if let Reversion::Reverted { .. } = revert_to_deployment(doc) {
            clean_workload(doc, Workload::Deployment, opts);
        }
    }
}

/// Cleans a pod spec located at `path` inside a resource of `kind`.
///
/// Each runtime field is checked against the state table at `path.<field>`
/// so preservation can keep it.
pub fn clean_pod_spec(spec: &mut Map, kind: &str, path: &str, opts: &CleanOptions) {
    for field in RUNTIME_POD_FIELDS {
        if !state::keeps(kind, &format!("{path}.{field}"), opts) {
            spec.delete(field);
        }
    }

    if !state::keeps(kind, &format!("{path}.tolerations"), opts) {
        strip_injected_tolerations(spec);
    }

    for key in ["containers", "initContainers"] {
        if let Some(containers) = spec.get_list_mut(key) {
            for container in containers.iter_mut() {
                if let Some(container) = container.as_map_mut() {
                    clean_container(container);
                }
            }
            containers.retain(|c| !c.is_empty_container());
        }
        spec.delete_if_empty(key);
    }

    remove_injected_volumes(spec);
}

fn strip_injected_tolerations(spec: &mut Map) {
    if let Some(tolerations) = spec.get_list_mut("tolerations") {
        tolerations.retain(|t| !is_injected_toleration(t));
    }
    spec.delete_if_empty("tolerations");
}

fn is_injected_toleration(toleration: &Value) -> bool {
    let Some(t) = toleration.as_map() else {
        return false;
    };
    t.get_str("effect") == Some("NoExecute")
        && t.get_str("key")
            .is_some_and(|k| INJECTED_TOLERATION_KEYS.contains(&k))
}

/// Cleans a single container spec.
pub fn clean_container(container: &mut Map) {
    for field in DEFAULTED_CONTAINER_FIELDS {
        container.delete(field);
    }

    let default_policy = container.get_str("image").map(default_pull_policy);
    if default_policy.is_some() && container.get_str("imagePullPolicy") == default_policy {
        container.delete("imagePullPolicy");
    }

    for flag in DEFAULT_FALSE_CONTAINER_FLAGS {
        if container.get(flag).and_then(Value::as_bool) == Some(false) {
            container.delete(flag);
        }
    }

    clean_ports(container);
}

/// Returns the pull policy the API server defaults for `image`.
///
/// Untagged and `:latest` images default to `Always`, everything else,
/// including digests, to `IfNotPresent`.
pub fn default_pull_policy(image: &str) -> &'static str {
    let last = image.rsplit('/').next().unwrap_or(image);
    if last.contains('@') {
        return "IfNotPresent";
    }
    match last.split_once(':') {
        None | Some((_, "latest")) => "Always",
        Some(_) => "IfNotPresent",
    }
}

/// Drops default `protocol: TCP` markers from `ports` entries owned by
/// `owner`, then drops emptied entries and an emptied list.
pub fn clean_ports(owner: &mut Map) {
    if let Some(ports) = owner.get_list_mut("ports") {
        for port in ports.iter_mut() {
            if let Some(port) = port.as_map_mut() {
                if port.get_str("protocol") == Some(DEFAULT_PROTOCOL) {
                    port.delete("protocol");
                }
            }
        }
        ports.retain(|p| !p.is_empty_container());
    }
    owner.delete_if_empty("ports");
}

/// Returns true for volumes that carry injected service account credentials.
pub fn is_injected_volume(volume: &Value) -> bool {
    let Some(volume) = volume.as_map() else {
        return false;
    };
    let named_injected = volume
        .get_str("name")
        .is_some_and(|name| INJECTED_VOLUME_PREFIXES.iter().any(|p| name.starts_with(p)));
    let projects_token = volume
        .get_map("projected")
        .and_then(|p| p.get("sources"))
        .and_then(Value::as_list)
        .is_some_and(|sources| {
            sources
                .iter()
                .filter_map(Value::as_map)
                .any(|s| s.has("serviceAccountToken"))
        });
    named_injected || projects_token
}

/// Removes injected credential volumes and every mount that references them.
///
/// Volumes go first and their names are recorded; mount lists of all
/// containers are then filtered against those names. Returns the removed
/// volume names.
pub fn remove_injected_volumes(spec: &mut Map) -> BTreeSet<String> {
    let mut removed = BTreeSet::new();
    if let Some(volumes) = spec.get_list_mut("volumes") {
        volumes.retain(|volume| {
            if !is_injected_volume(volume) {
                return true;
            }
            if let Some(name) = volume.as_map().and_then(|v| v.get_str("name")) {
                removed.insert(name.to_string());
            }
            false
        });
    }
    spec.delete_if_empty("volumes");

    if removed.is_empty() {
        return removed;
    }

    for key in MOUNTING_CONTAINER_LISTS {
        let Some(containers) = spec.get_list_mut(key) else {
            continue;
        };
        for container in containers.iter_mut().filter_map(Value::as_map_mut) {
            if let Some(mounts) = container.get_list_mut("volumeMounts") {
                mounts.retain(|mount| {
                    !mount
                        .as_map()
                        .and_then(|m| m.get_str("name"))
                        .is_some_and(|name| removed.contains(name))
                });
            }
            container.delete_if_empty("volumeMounts");
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::StateMode;
    use crate::value::from_yaml;
    use pretty_assertions::assert_eq;

    fn map(yaml: &str) -> Map {
        match from_yaml(yaml).unwrap() {
            Value::Map(m) => m,
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_default_pull_policy() {
        assert_eq!(default_pull_policy("nginx"), "Always");
        assert_eq!(default_pull_policy("nginx:latest"), "Always");
        assert_eq!(default_pull_policy("nginx:1.25"), "IfNotPresent");
        assert_eq!(default_pull_policy("registry:5000/team/app"), "Always");
        assert_eq!(default_pull_policy("registry:5000/team/app:v2"), "IfNotPresent");
        assert_eq!(default_pull_policy("app@sha256:abcd"), "IfNotPresent");
    }

    #[test]
    fn test_clean_container() {
        let mut container = map(
            r#"
name: app
image: nginx:1.25
imagePullPolicy: IfNotPresent
terminationMessagePath: /dev/termination-log
terminationMessagePolicy: File
tty: false
stdin: true
ports:
- containerPort: 80
  protocol: TCP
- containerPort: 53
  protocol: UDP
"#,
        );
        clean_container(&mut container);
        let expected = map(
            r#"
name: app
image: nginx:1.25
stdin: true
ports:
- containerPort: 80
- containerPort: 53
  protocol: UDP
"#,
        );
        assert_eq!(container, expected);
    }

    #[test]
    fn test_non_default_pull_policy_kept() {
        let mut container = map("name: app\nimage: nginx:1.25\nimagePullPolicy: Always");
        clean_container(&mut container);
        assert_eq!(container.get_str("imagePullPolicy"), Some("Always"));
    }

    #[test]
    fn test_port_entry_emptied_is_dropped() {
        let mut owner = map("ports:\n- protocol: TCP");
        clean_ports(&mut owner);
        assert!(!owner.has("ports"));
    }

    #[test]
    fn test_remove_injected_volumes_and_mounts() {
        let mut spec = map(
            r#"
containers:
- name: app
  volumeMounts:
  - name: data
    mountPath: /data
  - name: kube-api-access-x7k2p
    mountPath: /var/run/secrets/kubernetes.io/serviceaccount
initContainers:
- name: init
  volumeMounts:
  - name: token
    mountPath: /token
volumes:
- name: data
  emptyDir: {}
- name: kube-api-access-x7k2p
  projected:
    sources:
    - serviceAccountToken:
        path: token
- name: token
  projected:
    sources:
    - serviceAccountToken:
        path: token
"#,
        );
        let removed = remove_injected_volumes(&mut spec);
        assert_eq!(
            removed.into_iter().collect::<Vec<_>>(),
            vec!["kube-api-access-x7k2p".to_string(), "token".to_string()]
        );
        let expected = map(
            r#"
containers:
- name: app
  volumeMounts:
  - name: data
    mountPath: /data
initContainers:
- name: init
volumes:
- name: data
  emptyDir: {}
"#,
        );
        assert_eq!(spec, expected);
    }

    #[test]
    fn test_clean_pod_spec_runtime_fields() {
        let mut spec = map(
            r#"
nodeName: worker-1
schedulerName: default-scheduler
dnsPolicy: ClusterFirst
serviceAccount: default
serviceAccountName: builder
terminationGracePeriodSeconds: 30
restartPolicy: Always
tolerations:
- key: node.kubernetes.io/not-ready
  operator: Exists
  effect: NoExecute
  tolerationSeconds: 300
- key: dedicated
  operator: Equal
  value: gpu
containers:
- name: app
  image: nginx
  imagePullPolicy: Always
"#,
        );
        clean_pod_spec(&mut spec, POD, SPEC, &CleanOptions::default());
        let expected = map(
            r#"
serviceAccountName: builder
restartPolicy: Always
tolerations:
- key: dedicated
  operator: Equal
  value: gpu
containers:
- name: app
  image: nginx
"#,
        );
        assert_eq!(spec, expected);
    }

    #[test]
    fn test_clean_pod_spec_runtime_mode_keeps_runtime_fields() {
        let opts = CleanOptions::default().with_preserved_state(StateMode::Runtime);
        let mut spec = map("nodeName: worker-1\nhostname: web-0\ncontainers:\n- name: app");
        clean_pod_spec(&mut spec, POD, SPEC, &opts);
        assert_eq!(spec.get_str("nodeName"), Some("worker-1"));
        assert_eq!(spec.get_str("hostname"), Some("web-0"));
    }
}
