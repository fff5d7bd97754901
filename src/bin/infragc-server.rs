//! Diagram export REST API server
//!
//! ## Usage
//!
//! ```bash
//! PORT=3001 cargo run --bin infragc-server --features server
//!
//! curl -X POST http://localhost:3001/api/export/terraform \
//!   -H "Content-Type: application/json" \
//!   -d '{"nodes": [{"id": "v", "type": "vpc", "data": {"label": "VPC"}}], "edges": []}'
//!
//! curl http://localhost:3001/health
//! ```
//!
//! `INFRAGC_CONFIG` may point at a generator configuration JSON file.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use infragc::server::create_app;
use infragc::GeneratorConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("infragc=info,tower_http=info")),
        )
        .init();

    let config = match std::env::var_os("INFRAGC_CONFIG").map(PathBuf::from) {
        Some(path) => GeneratorConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    let port: u16 = match std::env::var("PORT") {
        Ok(value) => value.parse().with_context(|| format!("invalid PORT '{}'", value))?,
        Err(_) => 3001,
    };

    let app = create_app(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("Diagram compiler backend running on http://localhost:{}", port);
    tracing::info!("Terraform export endpoint: http://localhost:{}/api/export/terraform", port);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
