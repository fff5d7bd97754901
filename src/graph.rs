//! # Diagram Graph Model
//!
//! Nodes and edges exactly as the diagram editor exports them, plus the typed
//! per-kind attribute view the code generator works from.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// The type tag carried by a diagram node.
///
/// Unknown tags are kept as [`NodeKind::Other`] so a diagram containing
/// resources this compiler does not support still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Vpc,
    Subnet,
    RouteTable,
    InternetGateway,
    NatGateway,
    Ec2,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Vpc => "vpc",
            NodeKind::Subnet => "subnet",
            NodeKind::RouteTable => "routetable",
            NodeKind::InternetGateway => "internetgateway",
            NodeKind::NatGateway => "natgateway",
            NodeKind::Ec2 => "ec2",
            NodeKind::Other(tag) => tag,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, NodeKind::Other(_))
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        match tag {
            "vpc" => NodeKind::Vpc,
            "subnet" => NodeKind::Subnet,
            "routetable" => NodeKind::RouteTable,
            "internetgateway" => NodeKind::InternetGateway,
            "natgateway" => NodeKind::NatGateway,
            "ec2" => NodeKind::Ec2,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(NodeKind::from(tag.as_str()))
    }
}

/// One diagram element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub data: HashMap<String, Value>,
    #[serde(default)]
    pub parent_node: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            data: HashMap::new(),
            parent_node: None,
        }
    }

    /// Set a string attribute in the node's data map.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), Value::String(value.into()));
        self
    }

    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.with_data("label", label)
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_node = Some(parent.into());
        self
    }

    /// A non-empty string attribute; anything else counts as absent.
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.attr("label")
    }

    /// The human-facing name: the label, or the node id when there is none.
    pub fn display_name(&self) -> &str {
        self.label().unwrap_or(&self.id)
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_node.as_deref().filter(|p| !p.is_empty())
    }

    /// Project the raw data map onto the fields this node's kind recognises.
    pub fn attrs(&self) -> ResourceAttrs {
        let label = self.label().map(str::to_string);
        let owned = |key: &str| self.attr(key).map(str::to_string);

        match self.kind {
            NodeKind::Vpc => ResourceAttrs::Vpc(VpcAttrs {
                label,
                cidr: owned("cidr"),
            }),
            NodeKind::Subnet => ResourceAttrs::Subnet(SubnetAttrs {
                label,
                cidr: owned("cidr"),
                availability_zone: owned("availabilityZone"),
                route_table_id: owned("routeTableId"),
            }),
            NodeKind::RouteTable => ResourceAttrs::RouteTable(LabelAttrs { label }),
            NodeKind::InternetGateway => ResourceAttrs::InternetGateway(LabelAttrs { label }),
            NodeKind::NatGateway => ResourceAttrs::NatGateway(LabelAttrs { label }),
            NodeKind::Ec2 => ResourceAttrs::Ec2(InstanceAttrs {
                label,
                instance_type: owned("instanceType"),
                ami: owned("ami"),
            }),
            NodeKind::Other(_) => ResourceAttrs::Unsupported,
        }
    }
}

/// Typed view of a node's data, one variant per supported kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAttrs {
    Vpc(VpcAttrs),
    Subnet(SubnetAttrs),
    RouteTable(LabelAttrs),
    InternetGateway(LabelAttrs),
    NatGateway(LabelAttrs),
    Ec2(InstanceAttrs),
    Unsupported,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VpcAttrs {
    pub label: Option<String>,
    pub cidr: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetAttrs {
    pub label: Option<String>,
    pub cidr: Option<String>,
    pub availability_zone: Option<String>,
    /// Explicit association target, independent of the parent hierarchy.
    pub route_table_id: Option<String>,
}

/// Route tables and gateways recognise only a label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelAttrs {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceAttrs {
    pub label: Option<String>,
    pub instance_type: Option<String>,
    pub ami: Option<String>,
}

/// A diagram connection. Accepted for completeness; generation ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "source")]
    pub from: String,
    #[serde(alias = "target")]
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: None,
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A complete diagram: the unit of one generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramDescription {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl DiagramDescription {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }
}
