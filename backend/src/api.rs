// backend/src/api.rs

//! Role: Define REST endpoints for the frontend to consume.
//!
//! Endpoints:
//! - GET /dataset/metadata — column names plus distinct values of an
//!   optional category column, for populating selectors
//! - GET /metrics — confusion matrix and derived metrics, optionally broken
//!   out by category

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use clf_metrics::config::AppConfig;
use clf_metrics::data::columnar::LabelTable;
use clf_metrics::metrics::category::{compute_by_category, CategoryResultSet};

#[derive(Clone)]
pub struct AppState {
    pub table: Arc<LabelTable>,
    pub config: AppConfig,
}

pub fn create_routes(table: Arc<LabelTable>, config: AppConfig) -> Router {
    let state = AppState { table, config };
    Router::new()
        .route("/dataset/metadata", get(get_metadata))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

#[derive(Deserialize)]
struct MetadataParams {
    category_col: Option<String>,
}

#[derive(Serialize)]
struct DatasetMeta {
    rows: usize,
    columns: Vec<String>,
    categories: Vec<String>,
}

/// GET /dataset/metadata
async fn get_metadata(
    State(state): State<AppState>,
    Query(params): Query<MetadataParams>,
) -> Result<Json<DatasetMeta>, (StatusCode, String)> {
    let categories = match &params.category_col {
        Some(col) => state
            .table
            .distinct_values(col)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => Vec::new(),
    };
    Ok(Json(DatasetMeta {
        rows: state.table.len(),
        columns: state.table.column_names().to_vec(),
        categories,
    }))
}

#[derive(Deserialize)]
struct MetricsParams {
    truth_col: String,
    pred_col: String,
    category_col: Option<String>,
    /// Comma-separated category values to break out.
    categories: Option<String>,
    beta: Option<f64>,
}

/// GET /metrics
async fn get_metrics(
    State(state): State<AppState>,
    Query(params): Query<MetricsParams>,
) -> Result<Json<CategoryResultSet>, (StatusCode, String)> {
    let beta = state.config.clamp_beta(params.beta.unwrap_or(state.config.beta));
    let selected: Option<Vec<String>> = params.categories.as_ref().map(|list| {
        list.split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    });

    let results = compute_by_category(
        &state.table,
        &params.truth_col,
        &params.pred_col,
        params.category_col.as_deref(),
        selected.as_deref(),
        beta,
    )
    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    tracing::info!(
        "computed metrics: {} groups, {} skipped",
        results.groups.len(),
        results.skipped.len()
    );
    Ok(Json(results))
}
