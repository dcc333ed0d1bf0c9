use serde::{Deserialize, Serialize};

use crate::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Employee];

    /// Parse a role name as sent by the API. Anything unrecognised is `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "Admin" => Some(Role::Admin),
            "Manager" => Some(Role::Manager),
            "Employee" => Some(Role::Employee),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Employee => "Employee",
        }
    }

    /// Badge colour used wherever a role is shown.
    pub fn badge_variant(&self) -> &'static str {
        match self {
            Role::Admin => "danger",
            Role::Manager => "warning",
            Role::Employee => "info",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles that may manage users and most reference data.
pub const STAFF_ROLES: &[Role] = &[Role::Admin, Role::Manager];

/// Every role.
pub const ALL_ROLES: &[Role] = &Role::ALL;

/// True iff `current` is one of `required`.
///
/// A missing role or an empty requirement never grants access.
pub fn has_permission(required: &[Role], current: Option<Role>) -> bool {
    match current {
        Some(role) => required.contains(&role),
        None => false,
    }
}

/// Outcome of checking a guarded route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Render the protected content.
    Allow,
    /// Signed in, but the role is not allowed. Render the access-denied panel.
    Denied,
    /// No session. Redirect to the login view.
    Login,
}

/// Decide what a guarded route renders.
///
/// An empty `required` set only asks for a session.
pub fn guard(user: Option<&User>, required: &[Role]) -> Guard {
    let Some(user) = user else {
        return Guard::Login;
    };

    if required.is_empty() || has_permission(required, user.role) {
        Guard::Allow
    } else {
        Guard::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Option<Role>) -> User {
        User {
            id: 1,
            username: "sam".into(),
            email: "sam@example.com".into(),
            role,
            branch: None,
            branch_name: None,
            is_active: true,
            last_login: None,
        }
    }

    #[test]
    fn member_role_is_permitted() {
        assert!(has_permission(STAFF_ROLES, Some(Role::Admin)));
        assert!(has_permission(STAFF_ROLES, Some(Role::Manager)));
        assert!(!has_permission(STAFF_ROLES, Some(Role::Employee)));
    }

    #[test]
    fn missing_inputs_are_denied() {
        assert!(!has_permission(STAFF_ROLES, None));
        assert!(!has_permission(&[], Some(Role::Admin)));
        assert!(!has_permission(&[], None));
    }

    #[test]
    fn parse_is_strict_about_names() {
        assert_eq!(Role::parse("Manager"), Some(Role::Manager));
        assert_eq!(Role::parse(" Employee "), Some(Role::Employee));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("Owner"), None);
    }

    #[test]
    fn guard_without_session_asks_for_login() {
        assert_eq!(guard(None, STAFF_ROLES), Guard::Login);
        assert_eq!(guard(None, &[]), Guard::Login);
    }

    #[test]
    fn guard_denies_every_role_outside_the_set() {
        for role in Role::ALL {
            let expected = if STAFF_ROLES.contains(&role) {
                Guard::Allow
            } else {
                Guard::Denied
            };
            assert_eq!(guard(Some(&user(Some(role))), STAFF_ROLES), expected);
        }
        assert_eq!(guard(Some(&user(None)), STAFF_ROLES), Guard::Denied);
    }

    #[test]
    fn guard_with_no_requirement_only_needs_a_session() {
        assert_eq!(guard(Some(&user(None)), &[]), Guard::Allow);
        assert_eq!(guard(Some(&user(Some(Role::Employee))), &[]), Guard::Allow);
    }
}
