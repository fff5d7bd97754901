//! # Terraform Code Generator
//!
//! Generates a Terraform configuration from a diagram's nodes.

use super::hcl::quote;
use super::node_handlers::{emit, EmitContext};
use crate::config::GeneratorConfig;
use crate::graph::Node;
use crate::metadata::EMISSION_ORDER;
use crate::resolve::ReferenceResolver;

/// Diagram-to-Terraform generator for one request.
pub struct TerraformCodeGenerator<'a> {
    nodes: &'a [Node],
    config: &'a GeneratorConfig,
    resolver: ReferenceResolver<'a>,
}

impl<'a> TerraformCodeGenerator<'a> {
    pub fn new(nodes: &'a [Node], config: &'a GeneratorConfig) -> Self {
        Self {
            nodes,
            config,
            resolver: ReferenceResolver::new(nodes),
        }
    }

    /// Generate the complete configuration.
    ///
    /// The provider preamble comes first, then every resource in bucket
    /// order; each section is followed by one blank line.
    pub fn generate_program(&self) -> String {
        let cx = &EmitContext {
            resolver: &self.resolver,
            config: self.config,
        };

        let resources = EMISSION_ORDER.into_iter().flat_map(|kind| {
            kind.members(self.nodes).map(move |node| {
                tracing::debug!("[CODEGEN] {} {} -> {}", node.kind, node.id, kind.terraform_type());
                emit(cx, kind, node)
            })
        });

        std::iter::once(self.generate_provider())
            .chain(resources)
            .flat_map(|section| [section, String::new()])
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The `terraform` and `provider` blocks. Independent of the diagram.
    pub fn generate_provider(&self) -> String {
        format!(
            r#"terraform {{
  required_providers {{
    aws = {{
      source  = {source}
      version = {version}
    }}
  }}
}}

provider "aws" {{
  region = {region}  # Change to your preferred region
}}"#,
            source = quote(&self.config.provider_source),
            version = quote(&self.config.provider_version),
            region = quote(&self.config.region),
        )
    }

    /// Nodes whose kind this generator does not emit.
    pub fn unsupported_nodes(&self) -> impl Iterator<Item = &'a Node> {
        self.nodes.iter().filter(|node| !node.kind.is_supported())
    }
}
