//! # Symbolic Names
//!
//! Terraform resource names derived from diagram labels.

use crate::graph::Node;
use crate::metadata::ResourceKind;
use std::collections::{HashMap, HashSet};

/// Turn an arbitrary label into a Terraform identifier.
///
/// Lower-cases, maps everything outside `[a-z0-9_]` to `_`, collapses `_`
/// runs and trims `_` from both ends. A leading digit gets an `n_` prefix.
/// The prefix is applied last so that `sanitize(sanitize(x)) == sanitize(x)`.
///
/// Input made only of disallowed characters yields the empty string; callers
/// that need a usable name go through [`NameTable`].
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    let mut last_underscore = false;

    for ch in raw.chars() {
        let ch = ch.to_ascii_lowercase();
        let mapped = if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            ch
        } else {
            '_'
        };

        if mapped == '_' {
            if last_underscore || out.is_empty() {
                last_underscore = true;
                continue;
            }
            last_underscore = true;
        } else {
            last_underscore = false;
        }
        out.push(mapped);
    }

    if out.ends_with('_') {
        out.pop();
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "n_");
    }

    out
}

/// Symbolic names for every emitted node, assigned once per generation.
///
/// Names are unique per Terraform resource type: a later node whose label
/// sanitizes to a name already taken gets `_2`, `_3`, ... appended.
#[derive(Debug, Default)]
pub struct NameTable {
    names: HashMap<String, String>,
}

impl NameTable {
    /// Assign names in input order. Unsupported nodes get no entry.
    pub fn build(nodes: &[Node]) -> Self {
        let mut names = HashMap::new();
        let mut taken: HashMap<&'static str, HashSet<String>> = HashMap::new();

        for node in nodes {
            let Some(kind) = ResourceKind::primary_for(&node.kind) else {
                continue;
            };
            if names.contains_key(&node.id) {
                // Duplicate ids resolve to the first node, like every other lookup.
                continue;
            }

            let base = base_name(node, kind);
            let used = taken.entry(kind.terraform_type()).or_default();
            let mut candidate = base.clone();
            let mut suffix = 2;
            while used.contains(&candidate) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            if candidate != base {
                tracing::debug!(
                    "[NAMES] '{}' already used by another {}, renamed node {} to '{}'",
                    base,
                    kind.terraform_type(),
                    node.id,
                    candidate
                );
            }

            used.insert(candidate.clone());
            names.insert(node.id.clone(), candidate);
        }

        Self { names }
    }

    pub fn get(&self, node_id: &str) -> Option<&str> {
        self.names.get(node_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn base_name(node: &Node, kind: ResourceKind) -> String {
    let from_label = sanitize(node.display_name());
    if !from_label.is_empty() {
        return from_label;
    }
    let from_id = sanitize(&node.id);
    if !from_id.is_empty() {
        return from_id;
    }
    kind.placeholder().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use test_case::test_case;

    #[test_case("Main VPC", "main_vpc" ; "spaces")]
    #[test_case("VPC", "vpc" ; "upper case")]
    #[test_case("Public-Subnet #1", "public_subnet_1" ; "punctuation runs collapse")]
    #[test_case("__edge__", "edge" ; "trimmed")]
    #[test_case("10.0.1.0/24", "n_10_0_1_0_24" ; "leading digit")]
    #[test_case("_1abc", "n_1abc" ; "digit exposed by trimming")]
    #[test_case("Café Server", "caf_server" ; "non ascii")]
    #[test_case("!!!", "" ; "nothing usable")]
    #[test_case("", "" ; "empty")]
    fn sanitizes(raw: &str, expected: &str) {
        assert_eq!(sanitize(raw), expected);
    }

    #[test]
    fn sanitize_is_idempotent_on_examples() {
        for raw in ["Main VPC", "1st", "_9_", "a__b", "NAT Gateway_eip", "--x--"] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn duplicate_labels_get_suffixes_per_kind() {
        let nodes = vec![
            Node::new("a", NodeKind::Subnet).with_label("App"),
            Node::new("b", NodeKind::Subnet).with_label("app"),
            Node::new("c", NodeKind::Subnet).with_label("App 2"),
            Node::new("d", NodeKind::Ec2).with_label("App"),
        ];
        let table = NameTable::build(&nodes);

        assert_eq!(table.get("a"), Some("app"));
        assert_eq!(table.get("b"), Some("app_2"));
        assert_eq!(table.get("c"), Some("app_2_2"));
        // A different resource type does not collide.
        assert_eq!(table.get("d"), Some("app"));
    }

    #[test]
    fn unusable_label_falls_back_to_id_then_placeholder() {
        let nodes = vec![
            Node::new("subnet-7", NodeKind::Subnet).with_label("***"),
            Node::new("???", NodeKind::Vpc),
        ];
        let table = NameTable::build(&nodes);

        assert_eq!(table.get("subnet-7"), Some("subnet_7"));
        assert_eq!(table.get("???"), Some("vpc"));
    }

    #[test]
    fn unsupported_nodes_are_not_named() {
        let nodes = vec![Node::new("x", NodeKind::Other("lambda".into()))];
        assert!(NameTable::build(&nodes).is_empty());
    }
}
