// User Handlers - admin listing, admin creation, user deletion
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::info;

use crate::error::AppError;
use crate::proxy::credentials::{PanelCredentials, TokenScope};
use crate::proxy::server::AppState;

use super::{generate_password, is_numeric_id, non_blank};

/// GET /admins - root_admin users projected to {id, username}
pub async fn handle_list_admins(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let creds = PanelCredentials::from_query(&params)?;

    let users = state
        .upstream
        .request(&creds, TokenScope::Admin, Method::GET, "users", None)
        .await?;

    Ok(Json(Value::Array(project_admins(&users))))
}

/// POST /create-admin
///
/// Username and email are trimmed but case is preserved, unlike /create.
pub async fn handle_create_admin(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> Result<impl IntoResponse, AppError> {
    let creds = PanelCredentials::from_query(&params)?;
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);

    let (Some(username), Some(email)) = (non_blank(&body, "username"), non_blank(&body, "email"))
    else {
        return Err(AppError::Validation("Body: username, email".to_string()));
    };
    let username = username.to_string();
    let email = email.to_string();

    let password = generate_password(&username);

    state
        .upstream
        .request(
            &creds,
            TokenScope::Admin,
            Method::POST,
            "users",
            Some(&json!({
                "email": email,
                "username": username,
                "first_name": username,
                "last_name": "Admin",
                "password": password,
                "language": "en",
                "root_admin": true,
            })),
        )
        .await?;

    info!("Created admin user {} on {}", username, creds.panel_url);

    Ok(Json(json!({
        "username": username,
        "password": password,
        "panel_url": creds.panel_url,
    })))
}

/// DELETE /admin/:id - delete a panel user by numeric id
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
            TokenScope::Admin,
            Method::DELETE,
            &format!("users/{}", id),
            None,
        )
        .await?;

    info!("Deleted user {} on {}", id, creds.panel_url);
    Ok(Json(json!({ "success": true })))
}

/// Filter a panel user list down to admins, projected to {id, username}.
///
/// An item qualifies only with a truthy root_admin flag and a non-empty
/// username after trimming.
fn project_admins(users: &Value) -> Vec<Value> {
    users
        .get("data")
        .and_then(Value::as_array)
        .map(|data| {
            data.iter()
                .filter_map(|item| {
                    let attributes = item.get("attributes")?;
                    if !is_truthy(attributes.get("root_admin")) {
                        return None;
                    }
                    let username = attributes
                        .get("username")
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|u| !u.is_empty())?;
                    Some(json!({
                        "id": attributes.get("id"),
                        "username": username,
                    }))
                })
                .collect()
        })
        .unwrap_or_default()
}

// Panels have been seen reporting root_admin as a bool or as 0/1.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_admins_filters_and_projects() {
        let users = json!({
            "data": [
                {"attributes": {"id": 1, "username": " root ", "root_admin": true, "email": "r@x"}},
                {"attributes": {"id": 2, "username": "pleb", "root_admin": false}},
                {"attributes": {"id": 3, "username": "legacy", "root_admin": 1}},
                {"attributes": {"id": 4, "username": "", "root_admin": true}},
                {"attributes": {"id": 5, "root_admin": true}},
                {"no_attributes": true}
            ]
        });

        let admins = project_admins(&users);
        assert_eq!(
            admins,
            vec![
                json!({"id": 1, "username": "root"}),
                json!({"id": 3, "username": "legacy"}),
            ]
        );
    }

    #[test]
    fn test_project_admins_missing_data() {
        assert!(project_admins(&json!({})).is_empty());
        assert!(project_admins(&json!({"data": "nope"})).is_empty());
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&Value::Null)));
        assert!(!is_truthy(None));
    }
}
