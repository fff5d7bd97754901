//! # Export Envelope
//!
//! The request/response shapes of the Terraform export operation, kept free
//! of any HTTP types so the server and the CLI share them.

use crate::compiler::compile_nodes_with_config;
use crate::config::GeneratorConfig;
use crate::error::{ExportError, ExportResult};
use crate::graph::{Edge, Node};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated export request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Length of the submitted `edges` array, malformed entries included.
    pub submitted_edges: usize,
}

impl ExportRequest {
    /// Validate and decode a request body.
    ///
    /// `nodes` must be an array ([`ExportError::InvalidInput`] otherwise) and
    /// every element must decode ([`ExportError::MalformedNode`]). `edges` is
    /// optional and read leniently, since generation never looks at it.
    pub fn from_value(body: &Value) -> ExportResult<Self> {
        let raw_nodes = body
            .get("nodes")
            .and_then(Value::as_array)
            .ok_or(ExportError::InvalidInput)?;

        let nodes = raw_nodes
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                Node::deserialize(raw).map_err(|e| ExportError::MalformedNode {
                    index,
                    message: e.to_string(),
                })
            })
            .collect::<ExportResult<Vec<_>>>()?;

        let raw_edges = body
            .get("edges")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let edges = raw_edges
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| match Edge::deserialize(raw) {
                Ok(edge) => Some(edge),
                Err(e) => {
                    tracing::warn!("[EXPORT] Ignoring malformed edge {}: {}", index, e);
                    None
                }
            })
            .collect();

        Ok(Self {
            nodes,
            edges,
            submitted_edges: raw_edges.len(),
        })
    }

    pub fn from_json(text: &str) -> ExportResult<Self> {
        let body: Value = serde_json::from_str(text)?;
        Self::from_value(&body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStats {
    pub nodes: usize,
    pub edges: usize,
    /// Number of `\n`-separated lines in the generated text.
    pub lines: usize,
}

/// Successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub terraform: String,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
    pub stats: ExportStats,
}

impl ExportResponse {
    fn new(terraform: String, request: &ExportRequest) -> Self {
        let stats = ExportStats {
            nodes: request.nodes.len(),
            edges: request.submitted_edges,
            lines: terraform.split('\n').count(),
        };

        Self {
            success: true,
            terraform,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            stats,
        }
    }
}

/// Failed export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&ExportError> for ErrorBody {
    fn from(err: &ExportError) -> Self {
        match err {
            ExportError::InvalidInput => Self {
                error: err.to_string(),
                message: None,
            },
            ExportError::Json(e) => Self {
                error: "Invalid JSON body".to_string(),
                message: Some(e.to_string()),
            },
            ExportError::MalformedNode { .. } => Self {
                error: "Failed to generate Terraform code".to_string(),
                message: Some(err.to_string()),
            },
        }
    }
}

/// Run a whole export: validate the body, generate, and wrap the result.
///
/// # Arguments
///
/// * `body` - The raw request body, `{ "nodes": [...], "edges": [...] }`
/// * `config` - Generator configuration applied to every resource
///
/// # Returns
///
/// * `Ok(ExportResponse)` - Terraform text, stats and a timestamp
/// * `Err(ExportError)` - The envelope was invalid or a node did not decode
pub fn export_terraform(body: &Value, config: &GeneratorConfig) -> ExportResult<ExportResponse> {
    let request = ExportRequest::from_value(body)?;
    let terraform = compile_nodes_with_config(&request.nodes, &request.edges, config);
    Ok(ExportResponse::new(terraform, &request))
}
