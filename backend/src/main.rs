// backend/src/main.rs

//! Role: REST API over a previously ingested dataset.
//!
//! The dataset is loaded once from the SQLite cache (see the analysis
//! pipeline) and served read-only; every computation is a pure function of
//! the request parameters.

mod api;

use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use clf_metrics::config::AppConfig;
use clf_metrics::data::sqlite;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let cfg = AppConfig::from_env();
    let table = sqlite::load_dataset(&cfg.db_path)?;
    info!(
        "loaded dataset: {} rows, {} columns",
        table.len(),
        table.column_names().len()
    );

    let app = api::create_routes(Arc::new(table), cfg.clone()).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr.as_str()).await?;
    info!("backend listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
