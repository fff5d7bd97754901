//! # Infrastructure Diagram Graph Compiler (infragc)
//!
//! Compiles cloud network diagrams (VPCs, subnets, route tables, gateways
//! and instances, nested through parent links) into Terraform configuration
//! for the AWS provider.
//!
//! ## Quick Start
//!
//! ```rust
//! use infragc::{generate, Node, NodeKind};
//!
//! let nodes = vec![
//!     Node::new("node_1", NodeKind::Vpc).with_label("Main VPC"),
//!     Node::new("node_2", NodeKind::Subnet)
//!         .with_label("Public Subnet")
//!         .with_parent("node_1"),
//! ];
//!
//! let terraform = generate(&nodes, &[]);
//! assert!(terraform.contains("vpc_id            = aws_vpc.main_vpc.id"));
//! ```
//!
//! ## Architecture
//!
//! Generation is a pure function of the node list and a [`GeneratorConfig`]:
//!
//! 1. **Naming** - Every node gets a sanitized, per-type unique symbolic name
//! 2. **Bucketing** - Nodes are grouped by resource kind in a fixed
//!    dependency order (see [`metadata::EMISSION_ORDER`])
//! 3. **Resolution** - Cross-references follow `parentNode` links and fall
//!    back to placeholder names when the target is missing
//! 4. **Code Generation** - Each node renders to HCL; sections are joined
//!    with one blank line after each
//!
//! The request envelope used by the HTTP server and the CLI lives in
//! [`export`]; the axum routes are behind the `server` feature.

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod metadata;
pub mod naming;
pub mod resolve;
#[cfg(feature = "server")]
pub mod server;

// Re-export the main compilation API
pub use compiler::{compile_graph, compile_graph_with_config, compile_nodes_with_config, generate};

pub use config::{ConfigError, GeneratorConfig, Tag};
pub use error::{ExportError, ExportResult};
pub use export::{export_terraform, ErrorBody, ExportRequest, ExportResponse, ExportStats};
pub use graph::{DiagramDescription, Edge, Node, NodeKind, ResourceAttrs};
pub use metadata::ResourceKind;
pub use naming::sanitize;
pub use resolve::Reference;
