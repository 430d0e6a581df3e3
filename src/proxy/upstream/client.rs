// Upstream client for the Pterodactyl application API.
//
// One capability: submit a request to the panel, scoped as client or admin,
// and hand back parsed JSON or a classified failure.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header, Client, Method};
use serde_json::Value;
use tokio::time::Duration;

use crate::error::AppError;
use crate::proxy::credentials::{PanelCredentials, TokenScope};

static DUPLICATE_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new("//+").expect("valid regex"));

pub struct PanelClient {
    http_client: Client,
}

impl PanelClient {
    pub fn new(request_timeout: u64) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(request_timeout))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { http_client }
    }

    /// Build an application API URL
    ///
    /// Runs of slashes after the scheme separator are collapsed to one, so
    /// a sloppy `domain` or `path` cannot produce `...//api//...`.
    fn build_url(panel_url: &str, path: &str) -> String {
        let (scheme, rest) = panel_url.split_once("://").unwrap_or(("https", panel_url));
        let joined = format!("{}/api/application/{}", rest, path);
        format!("{}://{}", scheme, DUPLICATE_SLASHES.replace_all(&joined, "/"))
    }

    /// Call the panel's application API
    ///
    /// The bearer key is picked per call from the request's own credentials;
    /// the client itself holds no panel state beyond the connection pool.
    pub async fn request(
        &self,
        creds: &PanelCredentials,
        scope: TokenScope,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, AppError> {
        let url = Self::build_url(&creds.panel_url, path);

        let mut request = self
            .http_client
            .request(method, &url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(creds.key_for(scope));

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: extract_error_message(&text, status.as_u16()),
            });
        }

        // Deletes answer 204 with no body
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| AppError::InvalidResponse(e.to_string()))
    }
}

/// Pull a human-readable message out of a panel error body.
///
/// Priority: `errors[0].detail`, then top-level `message`, then a generic
/// `HTTP <status>` when the body is not JSON or carries neither field.
fn extract_error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|parsed| {
            let detail = parsed
                .pointer("/errors/0/detail")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .filter(|m| !m.is_empty());
            detail.or_else(|| {
                parsed
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .filter(|m| !m.is_empty())
            })
        })
        .unwrap_or_else(|| format!("HTTP {}", status))
}
