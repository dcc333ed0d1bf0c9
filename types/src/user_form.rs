use serde::Serialize;
use std::collections::BTreeMap;

use crate::{FieldErrors, Role, User};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Create/edit form for a user account.
#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub branch: Option<i64>,
    pub password: String,
    pub password_confirm: String,
    pub is_active: bool,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            role: Role::Employee,
            branch: None,
            password: String::new(),
            password_confirm: String::new(),
            is_active: true,
        }
    }
}

impl From<&User> for UserForm {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.unwrap_or(Role::Employee),
            branch: user.branch,
            password: String::new(),
            password_confirm: String::new(),
            is_active: user.is_active,
        }
    }
}

impl UserForm {
    /// Client-side checks run before anything is sent.
    ///
    /// Passwords are mandatory when creating. When editing they are optional,
    /// but if either is filled in both have to agree.
    pub fn validate(&self, editing: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.username.trim().is_empty() {
            errors.add("username", "Username is required");
        }
        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        }

        let changing_password = !self.password.is_empty() || !self.password_confirm.is_empty();
        if !editing && self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if changing_password && self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
            );
        }
        if (!editing || changing_password) && self.password != self.password_confirm {
            errors.add("password_confirm", "Passwords do not match");
        }

        errors
    }

    /// The request body. Empty password fields are left out when editing.
    pub fn payload(&self, editing: bool) -> UserPayload {
        let send_password = !editing || !self.password.is_empty();
        UserPayload {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role,
            branch: self.branch,
            is_active: self.is_active,
            password: send_password.then(|| self.password.clone()),
            password_confirm: send_password.then(|| self.password_confirm.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPayload {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub branch: Option<i64>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirm: Option<String>,
}

/// Body for an administrator setting another user's password.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetPassword {
    pub new_password: String,
    pub new_password_confirm: String,
}

impl SetPassword {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "new_password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
            );
        }
        if self.new_password != self.new_password_confirm {
            errors.add("new_password_confirm", "Passwords do not match");
        }
        errors
    }
}

/// The users screen's status dropdown, stored as `is_active` / `is_deleted` filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
    /// Soft-deleted accounts, which can be restored.
    Deleted,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Active,
        StatusFilter::Inactive,
        StatusFilter::Deleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
            StatusFilter::Deleted => "deleted",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All Status",
            StatusFilter::Active => "Active",
            StatusFilter::Inactive => "Inactive",
            StatusFilter::Deleted => "Deleted",
        }
    }

    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .unwrap_or_default()
    }

    pub fn from_filters(filters: &BTreeMap<String, String>) -> Self {
        if filters.get("is_deleted").is_some_and(|v| v == "true") {
            return StatusFilter::Deleted;
        }
        match filters.get("is_active").map(String::as_str) {
            Some("true") => StatusFilter::Active,
            Some("false") => StatusFilter::Inactive,
            _ => StatusFilter::All,
        }
    }

    /// `filters` with the status keys replaced by this choice.
    pub fn apply(self, filters: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut filters = filters.clone();
        filters.remove("is_active");
        filters.remove("is_deleted");

        let (key, value) = match self {
            StatusFilter::All => return filters,
            StatusFilter::Active => ("is_active", "true"),
            StatusFilter::Inactive => ("is_active", "false"),
            StatusFilter::Deleted => ("is_deleted", "true"),
        };
        filters.insert(key.to_string(), value.to_string());
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> UserForm {
        UserForm {
            username: "maria".into(),
            email: "maria@example.com".into(),
            role: Role::Manager,
            branch: Some(2),
            password: "s3cretpass".into(),
            password_confirm: "s3cretpass".into(),
            is_active: true,
        }
    }

    #[test]
    fn create_requires_everything() {
        let errors = UserForm::default().validate(false);
        assert!(errors.get("username").is_some());
        assert!(errors.get("email").is_some());
        assert_eq!(errors.joined("password").as_deref(), Some("Password is required"));
        assert!(errors.get("password_confirm").is_none());
    }

    #[test]
    fn create_checks_confirmation_and_length() {
        let mut form = filled();
        form.password_confirm = "different".into();
        let errors = form.validate(false);
        assert!(errors.get("password_confirm").is_some());

        let mut form = filled();
        form.password = "short".into();
        form.password_confirm = "short".into();
        assert!(form.validate(false).get("password").is_some());

        assert!(filled().validate(false).is_empty());
    }

    #[test]
    fn edit_allows_blank_password() {
        let mut form = filled();
        form.password.clear();
        form.password_confirm.clear();
        assert!(form.validate(true).is_empty());

        let payload = form.payload(true);
        assert_eq!(payload.password, None);
        let body = serde_json::to_value(&payload).unwrap();
        assert!(body.get("password").is_none());
        assert!(body.get("password_confirm").is_none());
        assert_eq!(body["role"], "Manager");
    }

    #[test]
    fn edit_with_password_must_match() {
        let mut form = filled();
        form.password_confirm.clear();
        assert!(form.validate(true).get("password_confirm").is_some());
    }

    #[test]
    fn create_payload_keeps_password() {
        let payload = filled().payload(false);
        assert_eq!(payload.password.as_deref(), Some("s3cretpass"));
        assert_eq!(payload.branch, Some(2));
    }

    #[test]
    fn form_from_user_starts_without_password() {
        let user: User = serde_json::from_str(
            r#"{"id": 3, "username": "li", "email": "li@example.com", "role": "Admin", "is_active": false}"#,
        )
        .unwrap();
        let form = UserForm::from(&user);
        assert_eq!(form.role, Role::Admin);
        assert!(!form.is_active);
        assert!(form.password.is_empty());
    }

    #[test]
    fn set_password_validation() {
        let ok = SetPassword {
            new_password: "longenough".into(),
            new_password_confirm: "longenough".into(),
        };
        assert!(ok.validate().is_empty());

        let bad = SetPassword {
            new_password: "short".into(),
            new_password_confirm: "other".into(),
        };
        let errors = bad.validate();
        assert!(errors.get("new_password").is_some());
        assert!(errors.get("new_password_confirm").is_some());
    }

    #[test]
    fn status_filter_replaces_status_keys_only() {
        let mut filters = BTreeMap::new();
        filters.insert("role".to_string(), "Manager".to_string());
        filters.insert("is_active".to_string(), "true".to_string());

        let deleted = StatusFilter::Deleted.apply(&filters);
        assert_eq!(deleted.get("role").map(String::as_str), Some("Manager"));
        assert_eq!(deleted.get("is_deleted").map(String::as_str), Some("true"));
        assert!(!deleted.contains_key("is_active"));
        assert_eq!(StatusFilter::from_filters(&deleted), StatusFilter::Deleted);

        let all = StatusFilter::All.apply(&deleted);
        assert_eq!(all.len(), 1);
        assert_eq!(StatusFilter::from_filters(&all), StatusFilter::All);
    }

    #[test]
    fn status_filter_parses_select_values() {
        assert_eq!(StatusFilter::parse("inactive"), StatusFilter::Inactive);
        assert_eq!(StatusFilter::parse(""), StatusFilter::All);
        assert_eq!(StatusFilter::parse("bogus"), StatusFilter::All);
        for status in StatusFilter::ALL {
            assert_eq!(StatusFilter::parse(status.as_str()), status);
        }
    }
}
