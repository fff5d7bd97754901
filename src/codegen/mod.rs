//! # Terraform Code Generation
//!
//! HCL rendering and the per-resource emitters behind the compiler.

pub mod hcl;
mod node_handlers;
mod tags;
mod terraform_codegen;

pub use hcl::{Block, BodyItem, Expr};
pub use tags::tag_entries;
pub use terraform_codegen::*;
