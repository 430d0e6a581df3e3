// Status Handler
use axum::extract::Query;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;

use crate::error::AppError;
use crate::proxy::credentials::PanelCredentials;

/// Status message plus the endpoint catalog.
///
/// Credentials are resolved first like on every other route, so a caller
/// can use `GET /` to check their query parameters are well-formed.
pub async fn handle_index(
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    PanelCredentials::from_query(&params)?;

    Ok(Json(json!({
        "message": "Pterodactyl Universal Proxy - Online",
        "time": Utc::now().to_rfc3339(),
        "endpoints": {
            "GET  /servers": "List servers",
            "GET  /admins": "List admin users",
            "POST /create": "Create user + server",
            "POST /create-admin": "Create admin user",
            "DELETE /server/:id": "Delete server",
            "DELETE /admin/:id": "Delete user"
        }
    })))
}
