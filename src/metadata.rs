//! # Resource Kind Metadata
//!
//! The closed set of Terraform resources the compiler emits, and the order
//! they are emitted in.
//!
//! The order is a hand-written topological sort of the kinds' dependencies:
//! networks before anything placed in them, route tables before the
//! associations and gateways that reference them, gateways before the
//! instances behind them. If kinds ever become open-ended this table should
//! be replaced by a real topological sort over declared dependencies.

use crate::graph::{Node, NodeKind};

/// One output bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Network,
    Subnetwork,
    RouteTable,
    RouteTableAssociation,
    InternetGateway,
    NatGateway,
    ComputeInstance,
}

/// Buckets in emission order.
pub const EMISSION_ORDER: [ResourceKind; 7] = [
    ResourceKind::Network,
    ResourceKind::Subnetwork,
    ResourceKind::RouteTable,
    ResourceKind::RouteTableAssociation,
    ResourceKind::InternetGateway,
    ResourceKind::NatGateway,
    ResourceKind::ComputeInstance,
];

impl ResourceKind {
    /// The diagram node kind whose nodes feed this bucket.
    pub fn source_kind(self) -> NodeKind {
        match self {
            ResourceKind::Network => NodeKind::Vpc,
            ResourceKind::Subnetwork | ResourceKind::RouteTableAssociation => NodeKind::Subnet,
            ResourceKind::RouteTable => NodeKind::RouteTable,
            ResourceKind::InternetGateway => NodeKind::InternetGateway,
            ResourceKind::NatGateway => NodeKind::NatGateway,
            ResourceKind::ComputeInstance => NodeKind::Ec2,
        }
    }

    /// The bucket that owns a node's symbolic name.
    ///
    /// Associations borrow the subnet's name, so they are never primary.
    pub fn primary_for(kind: &NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Vpc => Some(ResourceKind::Network),
            NodeKind::Subnet => Some(ResourceKind::Subnetwork),
            NodeKind::RouteTable => Some(ResourceKind::RouteTable),
            NodeKind::InternetGateway => Some(ResourceKind::InternetGateway),
            NodeKind::NatGateway => Some(ResourceKind::NatGateway),
            NodeKind::Ec2 => Some(ResourceKind::ComputeInstance),
            NodeKind::Other(_) => None,
        }
    }

    pub fn terraform_type(self) -> &'static str {
        match self {
            ResourceKind::Network => "aws_vpc",
            ResourceKind::Subnetwork => "aws_subnet",
            ResourceKind::RouteTable => "aws_route_table",
            ResourceKind::RouteTableAssociation => "aws_route_table_association",
            ResourceKind::InternetGateway => "aws_internet_gateway",
            ResourceKind::NatGateway => "aws_nat_gateway",
            ResourceKind::ComputeInstance => "aws_instance",
        }
    }

    /// Literal name referenced when the real target cannot be found.
    pub fn placeholder(self) -> &'static str {
        match self {
            ResourceKind::Network => "vpc",
            ResourceKind::Subnetwork => "subnet",
            ResourceKind::RouteTable => "route_table",
            ResourceKind::RouteTableAssociation => "association",
            ResourceKind::InternetGateway => "internet_gateway",
            ResourceKind::NatGateway => "nat_gateway",
            ResourceKind::ComputeInstance => "instance",
        }
    }

    /// Whether `node` belongs in this bucket.
    pub fn accepts(self, node: &Node) -> bool {
        if node.kind != self.source_kind() {
            return false;
        }
        match self {
            ResourceKind::RouteTableAssociation => node.attr("routeTableId").is_some(),
            _ => true,
        }
    }

    /// This bucket's members, in input order.
    pub fn members(self, nodes: &[Node]) -> impl Iterator<Item = &Node> {
        nodes.iter().filter(move |node| self.accepts(node))
    }
}
