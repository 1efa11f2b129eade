use serde::Deserialize;
use serde_json::Value;

/// Successful `verify-otp` body. `user` is opaque to the client and handed
/// back to the caller untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerifiedSession {
    pub token: String,
    #[serde(default)]
    pub user: Value,
}

impl VerifiedSession {
    /// Best-effort display name for the logged-in user.
    pub fn display_name(user: &Value) -> Option<&str> {
        ["email", "name", "id"]
            .iter()
            .find_map(|key| user.get(key).and_then(Value::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verified_session_user_defaults_to_null() {
        let session: VerifiedSession = serde_json::from_str(r#"{"token":"t"}"#).unwrap();
        assert_eq!(session.token, "t");
        assert!(session.user.is_null());
    }

    #[test]
    fn test_display_name_prefers_email() {
        let user = json!({ "id": "u1", "email": "a@b.c" });
        assert_eq!(VerifiedSession::display_name(&user), Some("a@b.c"));
        assert_eq!(VerifiedSession::display_name(&json!({ "id": "u1" })), Some("u1"));
        assert_eq!(VerifiedSession::display_name(&Value::Null), None);
    }
}
