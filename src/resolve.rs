//! # Reference Resolution
//!
//! Finds the block a node's Terraform must point at by walking `parentNode`
//! links. Lookups never fail: a missing or mistyped target resolves to the
//! kind's literal placeholder so the output stays well-formed for half-drawn
//! diagrams.

use crate::graph::{Node, NodeKind};
use crate::metadata::ResourceKind;
use crate::naming::NameTable;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The outcome of resolving a cross-reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// The symbolic name of an existing node.
    Resolved(String),
    /// The target could not be found; this literal name is referenced instead.
    Fallback(&'static str),
}

impl Reference {
    pub fn name(&self) -> &str {
        match self {
            Reference::Resolved(name) => name,
            Reference::Fallback(literal) => literal,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Reference::Resolved(_))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The gateway behind a route table's `0.0.0.0/0` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultRoute {
    Internet(String),
    Nat(String),
}

/// Read-only index over one request's nodes.
pub struct ReferenceResolver<'a> {
    nodes: &'a [Node],
    by_id: HashMap<&'a str, &'a Node>,
    names: NameTable,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            // First occurrence wins for duplicate ids.
            by_id.entry(node.id.as_str()).or_insert(node);
        }

        Self {
            nodes,
            by_id,
            names: NameTable::build(nodes),
        }
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.by_id.get(id).copied()
    }

    /// The symbolic name of a supported node.
    pub fn name_of(&self, node: &Node) -> &str {
        self.names.get(&node.id).unwrap_or_else(|| {
            ResourceKind::primary_for(&node.kind)
                .map(ResourceKind::placeholder)
                .unwrap_or("resource")
        })
    }

    fn parent(&self, node: &Node) -> Option<&'a Node> {
        node.parent_id().and_then(|id| self.node(id))
    }

    fn reference_to(&self, target: Option<&Node>, expected: ResourceKind) -> Reference {
        match target {
            Some(node) if node.kind == expected.source_kind() => {
                Reference::Resolved(self.name_of(node).to_string())
            }
            _ => Reference::Fallback(expected.placeholder()),
        }
    }

    /// A subnet's network: the nearest VPC up its parent chain.
    pub fn subnet_network(&self, subnet: &Node) -> Reference {
        let mut seen = HashSet::new();
        let mut current = self.parent(subnet);

        while let Some(node) = current {
            if !seen.insert(node.id.as_str()) {
                tracing::warn!("[RESOLVE] Parent cycle above subnet {}", subnet.id);
                break;
            }
            if node.kind == NodeKind::Vpc {
                return self.reference_to(Some(node), ResourceKind::Network);
            }
            current = self.parent(node);
        }

        self.fallback(subnet, ResourceKind::Network)
    }

    /// A route table's network is its direct parent.
    pub fn route_table_network(&self, route_table: &Node) -> Reference {
        self.checked(route_table, self.parent(route_table), ResourceKind::Network)
    }

    /// An internet gateway hangs off a route table; its network is that
    /// route table's parent.
    pub fn gateway_network(&self, gateway: &Node) -> Reference {
        let network = self.parent(gateway).and_then(|rt| self.parent(rt));
        self.checked(gateway, network, ResourceKind::Network)
    }

    /// The route table named by a subnet's explicit `routeTableId`.
    pub fn association_route_table(&self, subnet: &Node) -> Reference {
        let target = subnet.attr("routeTableId").and_then(|id| self.node(id));
        self.checked(subnet, target, ResourceKind::RouteTable)
    }

    /// An instance attaches to its direct parent subnet.
    pub fn instance_subnet(&self, instance: &Node) -> Reference {
        self.checked(instance, self.parent(instance), ResourceKind::Subnetwork)
    }

    /// The first internet gateway whose direct parent is this route table,
    /// else the first such NAT gateway. Internet gateways always win.
    pub fn default_route(&self, route_table: &Node) -> Option<DefaultRoute> {
        let child_of = |kind: NodeKind| {
            self.nodes
                .iter()
                .find(|n| n.kind == kind && n.parent_id() == Some(route_table.id.as_str()))
        };

        if let Some(igw) = child_of(NodeKind::InternetGateway) {
            return Some(DefaultRoute::Internet(self.name_of(igw).to_string()));
        }
        child_of(NodeKind::NatGateway).map(|nat| DefaultRoute::Nat(self.name_of(nat).to_string()))
    }

    /// The subnet a NAT gateway is placed in.
    ///
    /// Known limitation: this is the first subnet anywhere in the diagram,
    /// not one related to the NAT gateway's own network.
    pub fn nat_subnet(&self) -> Reference {
        let first = self.nodes.iter().find(|n| n.kind == NodeKind::Subnet);
        self.reference_to(first, ResourceKind::Subnetwork)
    }

    /// The internet gateway a NAT gateway waits for: the first one in the
    /// diagram, regardless of where it sits.
    pub fn nat_dependency(&self) -> Option<String> {
        self.nodes
            .iter()
            .find(|n| n.kind == NodeKind::InternetGateway)
            .map(|igw| self.name_of(igw).to_string())
    }

    fn checked(&self, source: &Node, target: Option<&Node>, expected: ResourceKind) -> Reference {
        let reference = self.reference_to(target, expected);
        if !reference.is_resolved() {
            self.log_fallback(source, expected);
        }
        reference
    }

    fn fallback(&self, source: &Node, expected: ResourceKind) -> Reference {
        self.log_fallback(source, expected);
        Reference::Fallback(expected.placeholder())
    }

    fn log_fallback(&self, source: &Node, expected: ResourceKind) {
        tracing::debug!(
            "[RESOLVE] No {} found for {} {}, referencing placeholder '{}'",
            expected.terraform_type(),
            source.kind,
            source.id,
            expected.placeholder()
        );
    }
}
