// Server Handlers
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::Method;
use serde_json::json;
use std::collections::HashMap;
use tracing::info;

use crate::error::AppError;
use crate::proxy::credentials::{PanelCredentials, TokenScope};
use crate::proxy::server::AppState;

use super::is_numeric_id;

/// GET /servers - relay the panel's server list
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let creds = PanelCredentials::from_query(&params)?;

    let list = state
        .upstream
        .request(&creds, TokenScope::Client, Method::GET, "servers", None)
        .await?;

    // The panel wraps the list in {"data": [...]}; relay the array as-is
    let data = list.get("data").cloned().unwrap_or_else(|| json!([]));
    Ok(Json(data))
}

/// DELETE /server/:id
///
/// Deleting an already-deleted server is not special-cased: the panel's
/// missing-resource error (404) is relayed like any other upstream error.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let creds = PanelCredentials::from_query(&params)?;

    if !is_numeric_id(&id) {
        return Err(AppError::NotFound);
    }

    state
        .upstream
        .request(
            &creds,
            TokenScope::Client,
            Method::DELETE,
            &format!("servers/{}", id),
            None,
        )
        .await?;

    info!("Deleted server {} on {}", id, creds.panel_url);
    Ok(Json(json!({ "success": true })))
}
