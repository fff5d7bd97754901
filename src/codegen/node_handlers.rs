//! # Node-Specific Handlers
//!
//! One emitter per resource bucket. Each returns the rendered text for a
//! single diagram node; a NAT gateway renders two blocks (its elastic IP
//! first).

use super::hcl::{Block, Expr};
use super::tags::tag_entries;
use crate::config::{GeneratorConfig, DEFAULT_AMI};
use crate::graph::{Node, ResourceAttrs};
use crate::metadata::ResourceKind;
use crate::resolve::{DefaultRoute, ReferenceResolver};

/// Everything a handler may read.
pub struct EmitContext<'r, 'a> {
    pub resolver: &'r ReferenceResolver<'a>,
    pub config: &'r GeneratorConfig,
}

impl EmitContext<'_, '_> {
    fn resource(&self, kind: ResourceKind, name: &str) -> Block {
        Block::new("resource").label(kind.terraform_type()).label(name)
    }

    fn tags(&self, name: &str) -> Vec<(String, String)> {
        tag_entries(name, self.config)
    }
}

/// Render `node` for the given bucket.
pub fn emit(cx: &EmitContext<'_, '_>, kind: ResourceKind, node: &Node) -> String {
    match kind {
        ResourceKind::Network => network(cx, node),
        ResourceKind::Subnetwork => subnetwork(cx, node),
        ResourceKind::RouteTable => route_table(cx, node),
        ResourceKind::RouteTableAssociation => route_table_association(cx, node),
        ResourceKind::InternetGateway => internet_gateway(cx, node),
        ResourceKind::NatGateway => nat_gateway(cx, node),
        ResourceKind::ComputeInstance => compute_instance(cx, node),
    }
}

fn network(cx: &EmitContext<'_, '_>, node: &Node) -> String {
    let cidr = match node.attrs() {
        ResourceAttrs::Vpc(attrs) => attrs.cidr,
        _ => None,
    };

    cx.resource(ResourceKind::Network, cx.resolver.name_of(node))
        .attr(
            "cidr_block",
            Expr::str(cidr.unwrap_or_else(|| cx.config.vpc_cidr.clone())),
        )
        .attr("enable_dns_hostnames", Expr::Bool(true))
        .attr("enable_dns_support", Expr::Bool(true))
        .blank()
        .map("tags", cx.tags(node.display_name()))
        .render()
}

fn subnetwork(cx: &EmitContext<'_, '_>, node: &Node) -> String {
    let (cidr, zone) = match node.attrs() {
        ResourceAttrs::Subnet(attrs) => (attrs.cidr, attrs.availability_zone),
        _ => (None, None),
    };
    let network = cx.resolver.subnet_network(node);

    let block = cx
        .resource(ResourceKind::Subnetwork, cx.resolver.name_of(node))
        .attr("vpc_id", Expr::id_of(ResourceKind::Network.terraform_type(), network.name()))
        .attr(
            "cidr_block",
            Expr::str(cidr.unwrap_or_else(|| cx.config.subnet_cidr.clone())),
        );

    let block = match zone {
        Some(zone) => block.attr("availability_zone", Expr::str(zone)),
        None => block.attr_with_comment(
            "availability_zone",
            Expr::str(cx.config.availability_zone.clone()),
            "Change as needed",
        ),
    };

    block
        .blank()
        .map("tags", cx.tags(node.display_name()))
        .render()
}

fn route_table(cx: &EmitContext<'_, '_>, node: &Node) -> String {
    let network = cx.resolver.route_table_network(node);

    let mut block = cx
        .resource(ResourceKind::RouteTable, cx.resolver.name_of(node))
        .attr("vpc_id", Expr::id_of(ResourceKind::Network.terraform_type(), network.name()));

    match cx.resolver.default_route(node) {
        Some(DefaultRoute::Internet(igw)) => {
            block = block.block(
                Block::new("route")
                    .attr("cidr_block", Expr::str("0.0.0.0/0"))
                    .attr(
                        "gateway_id",
                        Expr::id_of(ResourceKind::InternetGateway.terraform_type(), &igw),
                    ),
            );
        }
        Some(DefaultRoute::Nat(nat)) => {
            block = block.block(
                Block::new("route")
                    .attr("cidr_block", Expr::str("0.0.0.0/0"))
                    .attr(
                        "nat_gateway_id",
                        Expr::id_of(ResourceKind::NatGateway.terraform_type(), &nat),
                    ),
            );
        }
        None => {}
    }

    block
        .blank()
        .map("tags", cx.tags(node.display_name()))
        .render()
}

/// Associations take no tags.
fn route_table_association(cx: &EmitContext<'_, '_>, node: &Node) -> String {
    let subnet = cx.resolver.name_of(node);
    let route_table = cx.resolver.association_route_table(node);

    cx.resource(
        ResourceKind::RouteTableAssociation,
        &format!("{}_association", subnet),
    )
    .attr("subnet_id", Expr::id_of(ResourceKind::Subnetwork.terraform_type(), subnet))
    .attr(
        "route_table_id",
        Expr::id_of(ResourceKind::RouteTable.terraform_type(), route_table.name()),
    )
    .render()
}

fn internet_gateway(cx: &EmitContext<'_, '_>, node: &Node) -> String {
    let network = cx.resolver.gateway_network(node);

    cx.resource(ResourceKind::InternetGateway, cx.resolver.name_of(node))
        .attr("vpc_id", Expr::id_of(ResourceKind::Network.terraform_type(), network.name()))
        .blank()
        .map("tags", cx.tags(node.display_name()))
        .render()
}

fn nat_gateway(cx: &EmitContext<'_, '_>, node: &Node) -> String {
    let name = cx.resolver.name_of(node);
    let eip_name = format!("{}_eip", name);
    let subnet = cx.resolver.nat_subnet();

    let eip = Block::new("resource")
        .label("aws_eip")
        .label(&eip_name)
        .attr("domain", Expr::str("vpc"))
        .blank()
        .map("tags", cx.tags(&format!("{}_eip", node.display_name())));

    let mut nat = cx
        .resource(ResourceKind::NatGateway, name)
        .attr("allocation_id", Expr::id_of("aws_eip", &eip_name))
        .attr(
            "subnet_id",
            Expr::id_of(ResourceKind::Subnetwork.terraform_type(), subnet.name()),
        )
        .blank()
        .map("tags", cx.tags(node.display_name()));

    if let Some(igw) = cx.resolver.nat_dependency() {
        nat = nat.blank().attr(
            "depends_on",
            Expr::RefList(vec![format!(
                "{}.{}",
                ResourceKind::InternetGateway.terraform_type(),
                igw
            )]),
        );
    }

    format!("{}\n\n{}", eip.render(), nat.render())
}

fn compute_instance(cx: &EmitContext<'_, '_>, node: &Node) -> String {
    let (instance_type, ami) = match node.attrs() {
        ResourceAttrs::Ec2(attrs) => (attrs.instance_type, attrs.ami),
        _ => (None, None),
    };
    let subnet = cx.resolver.instance_subnet(node);
    let ami = ami.unwrap_or_else(|| cx.config.ami.clone());

    let block = cx.resource(ResourceKind::ComputeInstance, cx.resolver.name_of(node));
    let block = if ami == DEFAULT_AMI {
        block.attr_with_comment(
            "ami",
            Expr::str(ami),
            "Amazon Linux 2 (update for your region)",
        )
    } else {
        block.attr("ami", Expr::str(ami))
    };

    block
        .attr(
            "instance_type",
            Expr::str(instance_type.unwrap_or_else(|| cx.config.instance_type.clone())),
        )
        .attr(
            "subnet_id",
            Expr::id_of(ResourceKind::Subnetwork.terraform_type(), subnet.name()),
        )
        .blank()
        .map("tags", cx.tags(node.display_name()))
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use pretty_assertions::assert_eq;

    fn render(nodes: &[Node], kind: ResourceKind, index: usize) -> String {
        let resolver = ReferenceResolver::new(nodes);
        let config = GeneratorConfig::default();
        let cx = EmitContext {
            resolver: &resolver,
            config: &config,
        };
        emit(&cx, kind, &nodes[index])
    }

    #[test]
    fn vpc_block() {
        let nodes = vec![Node::new("v", NodeKind::Vpc)
            .with_label("VPC")
            .with_data("cidr", "10.0.0.0/16")];

        assert_eq!(
            render(&nodes, ResourceKind::Network, 0),
            r#"resource "aws_vpc" "vpc" {
  cidr_block           = "10.0.0.0/16"
  enable_dns_hostnames = true
  enable_dns_support   = true

  tags = {
    Name = "VPC"
    GeneratedBy = "InfraCrafter.com"
  }
}"#
        );
    }

    #[test]
    fn subnet_block_with_defaults() {
        let nodes = vec![
            Node::new("v", NodeKind::Vpc).with_label("Main VPC"),
            Node::new("s", NodeKind::Subnet).with_parent("v"),
        ];

        assert_eq!(
            render(&nodes, ResourceKind::Subnetwork, 1),
            r#"resource "aws_subnet" "s" {
  vpc_id            = aws_vpc.main_vpc.id
  cidr_block        = "10.0.1.0/24"
  availability_zone = "us-east-1a"  # Change as needed

  tags = {
    Name = "s"
    GeneratedBy = "InfraCrafter.com"
  }
}"#
        );
    }

    #[test]
    fn subnet_with_explicit_zone_has_no_comment() {
        let nodes = vec![Node::new("s", NodeKind::Subnet).with_data("availabilityZone", "eu-west-1b")];
        let text = render(&nodes, ResourceKind::Subnetwork, 0);

        assert!(text.contains("availability_zone = \"eu-west-1b\"\n"));
        assert!(text.contains("vpc_id            = aws_vpc.vpc.id"));
    }

    #[test]
    fn route_table_with_nat_route() {
        let nodes = vec![
            Node::new("v", NodeKind::Vpc).with_label("Main VPC"),
            Node::new("rt", NodeKind::RouteTable).with_label("Private RT").with_parent("v"),
            Node::new("n", NodeKind::NatGateway).with_label("NAT Gateway").with_parent("rt"),
        ];

        assert_eq!(
            render(&nodes, ResourceKind::RouteTable, 1),
            r#"resource "aws_route_table" "private_rt" {
  vpc_id = aws_vpc.main_vpc.id
  route {
    cidr_block     = "0.0.0.0/0"
    nat_gateway_id = aws_nat_gateway.nat_gateway.id
  }

  tags = {
    Name = "Private RT"
    GeneratedBy = "InfraCrafter.com"
  }
}"#
        );
    }

    #[test]
    fn route_table_without_gateway_has_no_route() {
        let nodes = vec![Node::new("rt", NodeKind::RouteTable).with_label("Lonely")];
        let text = render(&nodes, ResourceKind::RouteTable, 0);

        assert!(!text.contains("route {"));
        assert!(text.starts_with("resource \"aws_route_table\" \"lonely\" {\n  vpc_id = aws_vpc.vpc.id\n\n  tags = {"));
    }

    #[test]
    fn association_block() {
        let nodes = vec![
            Node::new("rt", NodeKind::RouteTable).with_label("Public RT"),
            Node::new("s", NodeKind::Subnet)
                .with_label("Public Subnet")
                .with_data("routeTableId", "rt"),
        ];

        assert_eq!(
            render(&nodes, ResourceKind::RouteTableAssociation, 1),
            r#"resource "aws_route_table_association" "public_subnet_association" {
  subnet_id      = aws_subnet.public_subnet.id
  route_table_id = aws_route_table.public_rt.id
}"#
        );
    }

    #[test]
    fn nat_gateway_renders_eip_then_gateway() {
        let nodes = vec![
            Node::new("s", NodeKind::Subnet).with_label("Public Subnet"),
            Node::new("igw", NodeKind::InternetGateway).with_label("Internet Gateway"),
            Node::new("n", NodeKind::NatGateway).with_label("NAT Gateway"),
        ];

        assert_eq!(
            render(&nodes, ResourceKind::NatGateway, 2),
            r#"resource "aws_eip" "nat_gateway_eip" {
  domain = "vpc"

  tags = {
    Name = "NAT Gateway_eip"
    GeneratedBy = "InfraCrafter.com"
  }
}

resource "aws_nat_gateway" "nat_gateway" {
  allocation_id = aws_eip.nat_gateway_eip.id
  subnet_id     = aws_subnet.public_subnet.id

  tags = {
    Name = "NAT Gateway"
    GeneratedBy = "InfraCrafter.com"
  }

  depends_on = [aws_internet_gateway.internet_gateway]
}"#
        );
    }

    #[test]
    fn instance_block() {
        let nodes = vec![
            Node::new("s", NodeKind::Subnet).with_label("Public Subnet"),
            Node::new("i", NodeKind::Ec2)
                .with_label("Web Server")
                .with_data("instanceType", "t3.small")
                .with_parent("s"),
        ];

        assert_eq!(
            render(&nodes, ResourceKind::ComputeInstance, 1),
            r#"resource "aws_instance" "web_server" {
  ami           = "ami-0c55b159cbfafe1f0"  # Amazon Linux 2 (update for your region)
  instance_type = "t3.small"
  subnet_id     = aws_subnet.public_subnet.id

  tags = {
    Name = "Web Server"
    GeneratedBy = "InfraCrafter.com"
  }
}"#
        );
    }

    #[test]
    fn custom_ami_drops_the_stock_comment() {
        let nodes = vec![Node::new("i", NodeKind::Ec2).with_data("ami", "ami-abc")];
        let text = render(&nodes, ResourceKind::ComputeInstance, 0);
        assert!(text.contains("ami           = \"ami-abc\"\n"));
    }
}
