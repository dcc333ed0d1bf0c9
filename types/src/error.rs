use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Message shown when neither the server nor the transport gave anything better.
pub const GENERIC_MESSAGE: &str = "An error occurred";

/// A serializable error for client rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Error {
    /// The display message.
    pub message: String,
    /// HTTP status of the response that produced this error, if any.
    #[serde(default)]
    pub status: Option<u16>,
    /// Per-field validation messages.
    #[serde(default)]
    pub fields: FieldErrors,
}

impl Error {
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_fields(mut self, fields: FieldErrors) -> Self {
        self.fields = fields;
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// Build an error from a JSON response body.
    ///
    /// Prefers `message`, then `detail`. A body made only of string or
    /// string-array values is treated as field validation errors.
    pub fn from_response_body(status: u16, body: &[u8]) -> Self {
        let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(body) else {
            return Error::from(GENERIC_MESSAGE).with_status(status);
        };

        for key in ["message", "detail"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return Error::from(message.as_str()).with_status(status);
            }
        }

        let value = serde_json::Value::Object(map);
        match serde_json::from_value::<FieldErrors>(value) {
            Ok(fields) if !fields.is_empty() => Error::from("Please correct the highlighted fields")
                .with_status(status)
                .with_fields(fields),
            _ => Error::from(GENERIC_MESSAGE).with_status(status),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self {
            message: s.to_string(),
            ..Default::default()
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self {
            message: s,
            ..Default::default()
        }
    }
}

/// Field name to one or more messages, as returned by the API on a 400.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(#[serde(with = "one_or_many")] BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// All messages for a field joined for inline display.
    pub fn joined(&self, field: &str) -> Option<String> {
        self.get(field).map(|messages| messages.join(", "))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The errors for every field not in `shown`, such as `non_field_errors`
    /// or fields a form has no input for.
    pub fn without(&self, shown: &[&str]) -> FieldErrors {
        FieldErrors(
            self.0
                .iter()
                .filter(|(field, _)| !shown.contains(&field.as_str()))
                .map(|(field, messages)| (field.clone(), messages.clone()))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

mod one_or_many {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    pub fn serialize<S>(map: &BTreeMap<String, Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(map)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, OneOrMany>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(field, value)| match value {
                OneOrMany::One(message) => (field, vec![message]),
                OneOrMany::Many(messages) => (field, messages),
            })
            .collect())
    }
}

/// Build an [`Error`] from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_message_over_detail() {
        let body = br#"{"message": "Branch is closed", "detail": "ignored"}"#;
        let error = Error::from_response_body(409, body);
        assert_eq!(error.message, "Branch is closed");
        assert_eq!(error.status, Some(409));
        assert!(error.fields.is_empty());
    }

    #[test]
    fn falls_back_to_detail() {
        let body = br#"{"detail": "Authentication credentials were not provided."}"#;
        let error = Error::from_response_body(401, body);
        assert_eq!(error.message, "Authentication credentials were not provided.");
        assert!(error.is_unauthorized());
    }

    #[test]
    fn field_errors_accept_strings_and_lists() {
        let body = br#"{"username": ["This field is required.", "Too short."], "email": "Invalid email."}"#;
        let error = Error::from_response_body(400, body);

        assert_eq!(
            error.fields.get("username"),
            Some(&["This field is required.".to_string(), "Too short.".to_string()][..])
        );
        assert_eq!(error.fields.joined("email").as_deref(), Some("Invalid email."));
        assert!(!error.message.is_empty());
    }

    #[test]
    fn errors_without_an_input_are_kept_apart() {
        let body = br#"{"username": "Taken.", "role": ["Invalid choice."], "non_field_errors": ["Branch required for employees."]}"#;
        let error = Error::from_response_body(400, body);
        assert_eq!(error.message, "Please correct the highlighted fields");

        let rest = error.fields.without(&["username", "email"]);
        assert!(rest.get("username").is_none());
        assert_eq!(rest.joined("role").as_deref(), Some("Invalid choice."));
        assert_eq!(
            rest.joined("non_field_errors").as_deref(),
            Some("Branch required for employees.")
        );
        assert!(error.fields.without(&["username", "role", "non_field_errors"]).is_empty());
    }

    #[test]
    fn non_json_body_is_generic() {
        let error = Error::from_response_body(502, b"<html>Bad Gateway</html>");
        assert_eq!(error.message, GENERIC_MESSAGE);
        assert_eq!(error.status, Some(502));
    }

    #[test]
    fn object_with_nested_values_is_generic() {
        let error = Error::from_response_body(500, br#"{"errors": {"code": 3}}"#);
        assert_eq!(error.message, GENERIC_MESSAGE);
        assert!(error.fields.is_empty());
    }

    #[test]
    fn err_macro_formats() {
        let error = err!("user {} not found", 42);
        assert_eq!(error.to_string(), "user 42 not found");
        assert_eq!(error.status, None);
    }
}
