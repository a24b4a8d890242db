mod error;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use smi_exporter_services::{Exporter, ExporterConfig, SmiCollector};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let config = ExporterConfig::from_env()?;
    info!(
        program = %config.smi.program,
        fields = config.smi.query_fields.len(),
        "Querying GPU via nvidia-smi"
    );

    let collector = SmiCollector::new(config.smi.clone());
    let exporter = Arc::new(Exporter::new(Arc::new(collector))?);
    let app = routes::router(exporter);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on port {}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
