//! Request DTOs for the cache server API
//!
//! Defines query parameters and key validation for incoming requests.

use serde::Deserialize;

/// Maximum key length accepted over HTTP, in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Which tier a clear request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearTier {
    Memory,
    Disk,
    #[default]
    All,
}

/// Query string for the clear operation (POST /clear?tier=...)
///
/// # Fields
/// - `tier`: `memory`, `disk` or `all` (default)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub tier: ClearTier,
}

/// Validates a key taken from the request path.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_request_deserialize() {
        let req: ClearRequest = serde_json::from_str(r#"{"tier": "memory"}"#).unwrap();
        assert_eq!(req.tier, ClearTier::Memory);

        let req: ClearRequest = serde_json::from_str(r#"{"tier": "disk"}"#).unwrap();
        assert_eq!(req.tier, ClearTier::Disk);
    }

    #[test]
    fn test_clear_request_defaults_to_all() {
        let req: ClearRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.tier, ClearTier::All);
    }

    #[test]
    fn test_clear_request_rejects_unknown_tier() {
        assert!(serde_json::from_str::<ClearRequest>(r#"{"tier": "cloud"}"#).is_err());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("").is_some());
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH + 1)).is_some());
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH)).is_none());
        assert!(validate_key("img:42").is_none());
    }
}
