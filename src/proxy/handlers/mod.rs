// API endpoint handlers

pub mod provision;
pub mod servers;
pub mod status;
pub mod users;

use rand::Rng;
use serde_json::Value;

use crate::error::AppError;

/// Router fallback: anything outside the fixed route table
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Throwaway panel password: username plus a random 0-9999 suffix.
/// The proxy never stores it; the success response is the only copy.
pub(crate) fn generate_password(username: &str) -> String {
    format!("{}{}", username, rand::thread_rng().gen_range(0..10_000))
}

/// Non-blank string field from a JSON body
pub(crate) fn non_blank<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Path ids must be digits only; anything else is treated as an unmatched
/// route, not a delete target.
pub(crate) fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_password_shape() {
        for _ in 0..50 {
            let password = generate_password("bob");
            let suffix = password.strip_prefix("bob").expect("username prefix");
            assert!(!suffix.is_empty() && suffix.len() <= 4);
            let n: u32 = suffix.parse().expect("numeric suffix");
            assert!(n < 10_000);
        }
    }

    #[test]
    fn test_non_blank() {
        let body = json!({"username": "  Bob  ", "email": "", "ram": 512});
        assert_eq!(non_blank(&body, "username"), Some("Bob"));
        assert_eq!(non_blank(&body, "email"), None);
        assert_eq!(non_blank(&body, "ram"), None);
        assert_eq!(non_blank(&body, "missing"), None);
    }

    #[test]
    fn test_is_numeric_id() {
        assert!(is_numeric_id("5"));
        assert!(is_numeric_id("00123"));
        assert!(!is_numeric_id(""));
        assert!(!is_numeric_id("5a"));
        assert!(!is_numeric_id("-5"));
        assert!(!is_numeric_id("1.5"));
    }
}
