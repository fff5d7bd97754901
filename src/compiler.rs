//! # Diagram Compiler
//!
//! Main entry points for compiling infrastructure diagrams to Terraform.

use crate::codegen::TerraformCodeGenerator;
use crate::config::GeneratorConfig;
use crate::graph::{DiagramDescription, Edge, Node};

/// Compile a diagram to Terraform source with the stock configuration.
///
/// This is the main entry point for the compiler. It never fails: missing
/// attributes take their defaults and unresolvable references point at
/// placeholder names, so a half-finished diagram still produces well-formed
/// output.
///
/// # Arguments
///
/// * `graph` - The diagram to compile
///
/// # Returns
///
/// The complete Terraform configuration, preamble first
///
/// # Examples
///
/// ```rust
/// use infragc::{compile_graph, DiagramDescription, Node, NodeKind};
///
/// let graph = DiagramDescription::new(
///     vec![Node::new("v", NodeKind::Vpc).with_label("VPC").with_data("cidr", "10.0.0.0/16")],
///     vec![],
/// );
/// let code = compile_graph(&graph);
/// assert!(code.contains(r#"resource "aws_vpc" "vpc""#));
/// ```
pub fn compile_graph(graph: &DiagramDescription) -> String {
    compile_graph_with_config(graph, &GeneratorConfig::default())
}

/// Compile a diagram with a custom generator configuration.
///
/// # Arguments
///
/// * `graph` - The diagram to compile
/// * `config` - Provider settings, attribute defaults and extra tags
///
/// # Returns
///
/// The complete Terraform configuration, preamble first
pub fn compile_graph_with_config(graph: &DiagramDescription, config: &GeneratorConfig) -> String {
    compile_nodes_with_config(&graph.nodes, &graph.edges, config)
}

/// Compile bare node and edge lists with the stock configuration.
///
/// Edges are accepted but play no part in generation; containment comes
/// from each node's `parentNode`.
///
/// # Arguments
///
/// * `nodes` - Diagram nodes in editor order
/// * `edges` - Diagram connections
///
/// # Returns
///
/// The complete Terraform configuration, preamble first
pub fn generate(nodes: &[Node], edges: &[Edge]) -> String {
    compile_nodes_with_config(nodes, edges, &GeneratorConfig::default())
}

/// Compile bare node and edge lists with a custom configuration.
///
/// # Arguments
///
/// * `nodes` - Diagram nodes in editor order
/// * `edges` - Diagram connections, counted for logging only
/// * `config` - Provider settings, attribute defaults and extra tags
///
/// # Returns
///
/// The complete Terraform configuration, preamble first
pub fn compile_nodes_with_config(nodes: &[Node], edges: &[Edge], config: &GeneratorConfig) -> String {
    tracing::info!("[INFRAGC] Starting diagram compilation");
    tracing::info!(
        "[INFRAGC] Diagram: {} nodes, {} edges",
        nodes.len(),
        edges.len()
    );

    // Phase 1: Index nodes and assign symbolic names
    tracing::info!("[INFRAGC] Phase 1: Indexing nodes...");
    let generator = TerraformCodeGenerator::new(nodes, config);

    for node in generator.unsupported_nodes() {
        tracing::warn!(
            "[INFRAGC] Skipping node {} of unsupported type '{}'",
            node.id,
            node.kind
        );
    }

    // Phase 2: Emit resources in dependency order
    tracing::info!("[INFRAGC] Phase 2: Generating Terraform code...");
    let code = generator.generate_program();

    tracing::info!("[INFRAGC] Code generation complete ({} bytes)", code.len());

    code
}
