// Per-request panel credentials.
//
// Every request carries its own panel target and keys in the query string;
// nothing here outlives the request, so concurrent requests against
// different panels cannot leak state into each other.

use std::collections::HashMap;
use url::Url;

use crate::error::AppError;

const MISSING_QUERY: &str = "Missing query: domain, plta, pltc";

/// Which panel API key a call is signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScope {
    /// The `plta` key
    Client,
    /// The `pltc` key
    Admin,
}

/// Panel target and keys resolved from one request's query string
#[derive(Debug, Clone)]
pub struct PanelCredentials {
    /// Panel base URL, trailing slashes stripped
    pub panel_url: String,
    client_key: String,
    admin_key: String,
}

impl PanelCredentials {
    /// Resolve credentials from the request's query parameters.
    ///
    /// All three of `domain`, `plta` and `pltc` must be present and
    /// non-blank after trimming. The domain must parse as an absolute
    /// http(s) URL once trailing slashes are stripped.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let value = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };

        let (Some(domain), Some(client_key), Some(admin_key)) =
            (value("domain"), value("plta"), value("pltc"))
        else {
            return Err(AppError::Validation(MISSING_QUERY.to_string()));
        };

        let panel_url = domain.trim_end_matches('/').to_string();
        let parsed = Url::parse(&panel_url)
            .map_err(|_| AppError::Validation(format!("Invalid panel domain: {}", panel_url)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::Validation(format!(
                "Invalid panel domain: {}",
                panel_url
            )));
        }

        Ok(Self {
            panel_url,
            client_key,
            admin_key,
        })
    }

    pub fn key_for(&self, scope: TokenScope) -> &str {
        match scope {
            TokenScope::Client => &self.client_key,
            TokenScope::Admin => &self.admin_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_all_keys_required() {
        for missing in ["domain", "plta", "pltc"] {
            let mut params = query(&[
                ("domain", "https://panel.example.com"),
                ("plta", "client-key"),
                ("pltc", "admin-key"),
            ]);
            params.remove(missing);

            let err = PanelCredentials::from_query(&params).unwrap_err();
            assert_eq!(err.to_string(), MISSING_QUERY, "missing {}", missing);
        }
    }

    #[test]
    fn test_blank_value_rejected() {
        let params = query(&[
            ("domain", "https://panel.example.com"),
            ("plta", "   "),
            ("pltc", "admin-key"),
        ]);
        assert!(PanelCredentials::from_query(&params).is_err());
    }

    #[test]
    fn test_trailing_slashes_stripped() {
        let params = query(&[
            ("domain", "https://panel.example.com///"),
            ("plta", "client-key"),
            ("pltc", "admin-key"),
        ]);
        let creds = PanelCredentials::from_query(&params).expect("valid credentials");
        assert_eq!(creds.panel_url, "https://panel.example.com");
    }

    #[test]
    fn test_non_http_domain_rejected() {
        for domain in ["ftp://panel.example.com", "panel.example.com", "not a url"] {
            let params = query(&[("domain", domain), ("plta", "a"), ("pltc", "b")]);
            assert!(
                PanelCredentials::from_query(&params).is_err(),
                "accepted {}",
                domain
            );
        }
    }

    #[test]
    fn test_scope_selects_key() {
        let params = query(&[
            ("domain", "https://panel.example.com"),
            ("plta", "client-key"),
            ("pltc", "admin-key"),
        ]);
        let creds = PanelCredentials::from_query(&params).expect("valid credentials");
        assert_eq!(creds.key_for(TokenScope::Client), "client-key");
        assert_eq!(creds.key_for(TokenScope::Admin), "admin-key");
    }
}
