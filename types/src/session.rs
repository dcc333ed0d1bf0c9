use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Role;

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    #[serde(default)]
    pub branch: Option<i64>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_login: Option<Timestamp>,
}

fn default_true() -> bool {
    true
}

/// Unknown or non-string roles become `None` instead of failing the record.
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(Role::parse))
}

/// Accepts an RFC 3339 instant, or a datetime without an offset read as UTC.
/// Anything else becomes `None` instead of failing the record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(raw) = value.as_ref().and_then(serde_json::Value::as_str) else {
        return Ok(None);
    };

    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(Some(ts));
    }
    Ok(raw
        .parse::<jiff::civil::DateTime>()
        .ok()
        .and_then(|dt| dt.to_zoned(jiff::tz::TimeZone::UTC).ok())
        .map(|zoned| zoned.timestamp()))
}

/// Username and password sent to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    #[serde(with = "secret_string")]
    pub password: SecretString,
}

/// Partial update of the signed-in user's own profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    #[serde(with = "secret_string")]
    pub old_password: SecretString,
    #[serde(with = "secret_string")]
    pub new_password: SecretString,
    #[serde(with = "secret_string")]
    pub new_password_confirm: SecretString,
}

/// The access/refresh pair issued by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(with = "secret_string")]
    pub access: SecretString,
    #[serde(with = "secret_string")]
    pub refresh: SecretString,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: SecretString::from(access.into()),
            refresh: SecretString::from(refresh.into()),
        }
    }
}

/// Response of the refresh endpoint. Some backends rotate the refresh token.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedTokens {
    #[serde(with = "secret_string")]
    pub access: SecretString,
    #[serde(default, with = "optional_secret_string")]
    pub refresh: Option<SecretString>,
}

/// Read the `exp` claim of a JWT without verifying it.
///
/// Returns `None` for anything that is not a three-part token with a numeric
/// `exp` in its payload.
pub fn token_expiry(token: &SecretString) -> Option<Timestamp> {
    use base64::Engine;

    let mut parts = token.expose_secret().split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return None,
    };
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    Timestamp::from_second(exp).ok()
}

/// Whether the token is a JWT whose `exp` is at or before `now`.
pub fn token_expired(token: &SecretString, now: Timestamp) -> bool {
    token_expiry(token).is_some_and(|exp| exp <= now)
}

mod secret_string {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use secrecy::ExposeSecret;
        serializer.serialize_str(secret.expose_secret())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.into())
    }
}

mod optional_secret_string {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn jwt_with_exp(exp: i64) -> SecretString {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = engine.encode(format!(r#"{{"user_id":1,"exp":{exp}}}"#));
        SecretString::from(format!("{header}.{payload}.signature"))
    }

    #[test]
    fn user_with_unknown_role_still_parses() {
        let user: User = serde_json::from_str(
            r#"{"id": 7, "username": "ana", "email": "ana@example.com", "role": "Superuser"}"#,
        )
        .unwrap();
        assert_eq!(user.role, None);
        assert!(user.is_active);
        assert_eq!(user.last_login, None);
    }

    #[test]
    fn user_with_non_string_role_still_parses() {
        let user: User = serde_json::from_str(r#"{"id": 7, "username": "ana", "role": 3}"#).unwrap();
        assert_eq!(user.role, None);
    }

    #[test]
    fn last_login_without_offset_is_read_as_utc() {
        let user: User = serde_json::from_str(
            r#"{"id": 7, "username": "ana", "last_login": "2024-03-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(
            user.last_login,
            Some("2024-03-01T10:00:00Z".parse::<Timestamp>().unwrap())
        );

        let user: User = serde_json::from_str(
            r#"{"id": 7, "username": "ana", "last_login": "yesterday"}"#,
        )
        .unwrap();
        assert_eq!(user.last_login, None);

        let user: User =
            serde_json::from_str(r#"{"id": 7, "username": "ana", "last_login": null}"#).unwrap();
        assert_eq!(user.last_login, None);
    }

    #[test]
    fn user_full_record() {
        let user: User = serde_json::from_str(
            r#"{
                "id": 1,
                "username": "admin",
                "email": "admin@example.com",
                "role": "Admin",
                "branch": 4,
                "branch_name": "Downtown",
                "is_active": false,
                "last_login": "2024-03-01T10:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(user.role, Some(Role::Admin));
        assert_eq!(user.branch, Some(4));
        assert_eq!(user.branch_name.as_deref(), Some("Downtown"));
        assert!(!user.is_active);
        assert!(user.last_login.is_some());
    }

    #[test]
    fn token_pair_uses_wire_names() {
        let pair: TokenPair = serde_json::from_str(r#"{"access": "a1", "refresh": "r1"}"#).unwrap();
        assert_eq!(pair.access.expose_secret(), "a1");
        assert_eq!(pair.refresh.expose_secret(), "r1");
    }

    #[test]
    fn token_pair_debug_hides_secrets() {
        let pair = TokenPair::new("very-secret-access", "very-secret-refresh");
        let debug = format!("{pair:?}");
        assert!(!debug.contains("very-secret-access"));
        assert!(!debug.contains("very-secret-refresh"));
    }

    #[test]
    fn refreshed_tokens_without_rotation() {
        let tokens: RefreshedTokens = serde_json::from_str(r#"{"access": "a2"}"#).unwrap();
        assert_eq!(tokens.access.expose_secret(), "a2");
        assert!(tokens.refresh.is_none());
    }

    #[test]
    fn reads_jwt_expiry() {
        let token = jwt_with_exp(1_700_000_000);
        assert_eq!(
            token_expiry(&token),
            Some(Timestamp::from_second(1_700_000_000).unwrap())
        );

        let before = Timestamp::from_second(1_699_999_999).unwrap();
        let after = Timestamp::from_second(1_700_000_001).unwrap();
        assert!(!token_expired(&token, before));
        assert!(token_expired(&token, after));
    }

    #[test]
    fn opaque_tokens_never_expire() {
        let token = SecretString::from("not-a-jwt".to_string());
        assert_eq!(token_expiry(&token), None);
        assert!(!token_expired(&token, Timestamp::now()));
    }
}
