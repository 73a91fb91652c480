//! Payload-shape helpers for upstream responses.
//!
//! Discogs signals a negative lookup with a 200 response whose body is a
//! minimal object carrying a single key (usually just `message`), not with
//! an HTTP error status. Distinguishing that shape from a real resource is
//! the caller's concern; the check itself lives here.

use serde_json::Value;

/// Whether a 200 payload is the upstream's minimal "no such resource"
/// shape: an object with exactly one key.
pub fn is_negative_lookup(payload: &Value) -> bool {
    payload.as_object().is_some_and(|obj| obj.len() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_key_object_is_negative() {
        let payload = json!({"message": "Artist not found."});
        assert!(is_negative_lookup(&payload));
    }

    #[test]
    fn test_full_resource_is_not_negative() {
        let payload = json!({"id": 1, "name": "Test", "releases_url": "https://api.discogs.com/artists/1/releases"});
        assert!(!is_negative_lookup(&payload));
    }

    #[test]
    fn test_non_object_is_not_negative() {
        assert!(!is_negative_lookup(&json!(["a", "b"])));
        assert!(!is_negative_lookup(&json!("message")));
        assert!(!is_negative_lookup(&json!(null)));
    }
}
