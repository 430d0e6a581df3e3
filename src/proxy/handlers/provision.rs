// Provision Handler - POST /create, the only multi-step route
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::info;

use crate::error::AppError;
use crate::proxy::credentials::{PanelCredentials, TokenScope};
use crate::proxy::server::AppState;

use super::{generate_password, non_blank};

const BODY_REQUIREMENTS: &str = "Body: username, email, ram (number)";

/// POST /create - create a panel user, then a server owned by it.
///
/// Three sequential upstream calls: create the user, fetch the configured
/// egg for its docker image and startup command, create the server. The
/// first failure aborts the rest and its upstream message is relayed.
///
/// There is no rollback: if server creation fails the freshly created user
/// stays on the panel, and the caller sees the server-creation error.
pub async fn handle_create(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> Result<impl IntoResponse, AppError> {
    let creds = PanelCredentials::from_query(&params)?;
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);

    let (Some(username), Some(email)) = (non_blank(&body, "username"), non_blank(&body, "email"))
    else {
        return Err(AppError::Validation(BODY_REQUIREMENTS.to_string()));
    };
    let ram = body
        .get("ram")
        .cloned()
        .filter(Value::is_number)
        .ok_or_else(|| AppError::Validation(BODY_REQUIREMENTS.to_string()))?;

    let policy = &state.policy;

    let username = username.to_lowercase();
    let email = email.to_lowercase();
    let password = generate_password(&username);
    let server_name = format!("{}-server", username);

    // Optional resource overrides keep the caller's numbers as sent; a
    // missing or zero disk falls back to ram, a missing cpu to the policy
    // default (an explicit 0 means unlimited on the panel and is kept).
    let disk = body
        .get("disk")
        .cloned()
        .filter(|v| v.is_number() && v.as_f64() != Some(0.0))
        .unwrap_or_else(|| ram.clone());
    let cpu = body
        .get("cpu")
        .cloned()
        .filter(Value::is_number)
        .unwrap_or_else(|| json!(policy.default_cpu_percent));

    // Step 1: the panel user the server will belong to
    let user = state
        .upstream
        .request(
            &creds,
            TokenScope::Client,
            Method::POST,
            "users",
            Some(&json!({
                "email": email,
                "username": username,
                "first_name": username,
                "last_name": "User",
                "password": password,
                "language": "en",
            })),
        )
        .await?;

    let user_id = user
        .pointer("/attributes/id")
        .and_then(Value::as_i64)
        .ok_or_else(|| {
            AppError::InvalidResponse("user creation response carries no id".to_string())
        })?;

    // Step 2: the configured egg, for its docker image and startup command
    let egg = state
        .upstream
        .request(
            &creds,
            TokenScope::Client,
            Method::GET,
            &policy.egg_path(),
            None,
        )
        .await?;

    let docker_image = egg
        .pointer("/attributes/docker_image")
        .cloned()
        .unwrap_or(Value::Null);
    let startup = egg
        .pointer("/attributes/startup")
        .cloned()
        .unwrap_or(Value::Null);

    // Step 3: the server itself
    let server = state
        .upstream
        .request(
            &creds,
            TokenScope::Client,
            Method::POST,
            "servers",
            Some(&json!({
                "name": server_name,
                "user": user_id,
                "egg": policy.egg_id,
                "docker_image": docker_image,
                "startup": startup,
                "environment": policy.environment,
                "limits": {
                    "memory": ram,
                    "swap": policy.swap_mb,
                    "disk": disk,
                    "io": policy.io_weight,
                    "cpu": cpu,
                },
                "feature_limits": {
                    "databases": policy.databases,
                    "backups": policy.backups,
                    "allocations": policy.allocations,
                },
                "deploy": {
                    "locations": [policy.location_id],
                    "dedicated_ip": false,
                    "port_range": [],
                },
            })),
        )
        .await?;

    let server_id = server
        .pointer("/attributes/id")
        .cloned()
        .unwrap_or(Value::Null);

    info!(
        "Provisioned user {} (id {}) with server {:?} on {}",
        username, user_id, server_id, creds.panel_url
    );

    Ok(Json(json!({
        "username": username,
        "password": password,
        "email": email,
        "panel_url": creds.panel_url,
        "server_id": server_id,
    })))
}
