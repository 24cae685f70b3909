//! Unwrapping of the envelope shapes the remote API uses

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::warn;

/// Empty or non-JSON bodies become `Null`
pub fn parse_body(text: &str) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|e| {
        warn!(error = %e, "response body is not JSON");
        JsonValue::Null
    })
}

/// First present envelope key, or the body itself
pub fn unwrap_envelope<'a>(body: &'a JsonValue, keys: &[&str]) -> &'a JsonValue {
    keys.iter().find_map(|key| body.get(*key).filter(|v| !v.is_null())).unwrap_or(body)
}

/// List items under the first present envelope key; anything that is not a list yields nothing
pub fn unwrap_list<'a>(body: &'a JsonValue, keys: &[&str]) -> &'a [JsonValue] {
    match unwrap_envelope(body, keys) {
        JsonValue::Array(items) => items,
        _ => &[],
    }
}

/// Deserialize each list item, skipping (and logging) malformed ones
pub fn decode_items<T: DeserializeOwned>(items: &[JsonValue], what: &str) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(kind = what, error = %e, "skipping malformed item");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), JsonValue::Null);
        assert_eq!(parse_body("<html>oops</html>"), JsonValue::Null);
        assert_eq!(parse_body("{\"ok\":true}"), json!({"ok": true}));
    }

    #[test]
    fn test_envelopes() {
        let keys = ["connectors", "data"];
        assert_eq!(unwrap_list(&json!({"connectors": [1, 2]}), &keys).len(), 2);
        assert_eq!(unwrap_list(&json!({"data": [1]}), &keys).len(), 1);
        assert_eq!(unwrap_list(&json!([1, 2, 3]), &keys).len(), 3);
        assert!(unwrap_list(&json!({"other": [1]}), &keys).is_empty());
        assert!(unwrap_list(&JsonValue::Null, &keys).is_empty());

        let action = json!({"action": {"id": "a"}});
        assert_eq!(unwrap_envelope(&action, &["action", "data"]), &json!({"id": "a"}));
        let bare = json!({"id": "b"});
        assert_eq!(unwrap_envelope(&bare, &["action", "data"]), &bare);
    }
}
