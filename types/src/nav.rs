//! Sidebar menu as data.
//!
//! [`MENU`] is the single source for both the sidebar and the route guards:
//! [`visible_menu`] filters it for a role, [`required_roles`] answers which
//! roles a path needs.

use crate::{ALL_ROLES, Role, STAFF_ROLES, has_permission};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavNode {
    pub label: &'static str,
    /// Icon class name.
    pub icon: &'static str,
    /// Link target. Groups have none.
    pub path: Option<&'static str>,
    /// Roles allowed to see a leaf. Ignored for groups.
    pub roles: &'static [Role],
    pub children: &'static [NavNode],
}

impl NavNode {
    const fn leaf(label: &'static str, icon: &'static str, path: &'static str, roles: &'static [Role]) -> Self {
        Self {
            label,
            icon,
            path: Some(path),
            roles,
            children: &[],
        }
    }

    const fn group(label: &'static str, icon: &'static str, children: &'static [NavNode]) -> Self {
        Self {
            label,
            icon,
            path: None,
            roles: &[],
            children,
        }
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

pub const MENU: &[NavNode] = &[
    NavNode::leaf("Dashboard", "fas fa-tachometer-alt", "/dashboard", ALL_ROLES),
    NavNode::leaf("User Management", "fas fa-users", "/users", STAFF_ROLES),
    NavNode::group(
        "Core Data",
        "fas fa-database",
        &[
            NavNode::leaf("Branches", "", "/branches", STAFF_ROLES),
            NavNode::leaf("Warehouses", "", "/warehouses", STAFF_ROLES),
            NavNode::leaf("Vendors", "", "/vendors", STAFF_ROLES),
            NavNode::leaf("Customers", "", "/customers", ALL_ROLES),
            NavNode::leaf("Sellers", "", "/sellers", STAFF_ROLES),
        ],
    ),
    NavNode::group(
        "Inventory",
        "fas fa-boxes",
        &[
            NavNode::leaf("Gold Products", "", "/inventory/gold-products", STAFF_ROLES),
            NavNode::leaf("Silver Products", "", "/inventory/silver-products", STAFF_ROLES),
            NavNode::leaf("Gold Stock", "", "/inventory/gold-stock", ALL_ROLES),
            NavNode::leaf("Silver Stock", "", "/inventory/silver-stock", ALL_ROLES),
        ],
    ),
    NavNode::group(
        "Invoicing",
        "fas fa-file-invoice",
        &[
            NavNode::leaf("Gold Invoices", "", "/invoices/gold", ALL_ROLES),
            NavNode::leaf("Silver Invoices", "", "/invoices/silver", ALL_ROLES),
        ],
    ),
    NavNode::leaf(
        "Warehouse Transfers",
        "fas fa-exchange-alt",
        "/warehouse-transactions",
        ALL_ROLES,
    ),
];

/// A menu entry after filtering for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNav {
    pub node: &'static NavNode,
    pub children: Vec<&'static NavNode>,
}

/// Filter `menu` for `role`.
///
/// Leaves pass through [`has_permission`]. A group survives only with at
/// least one visible child and carries exactly those children.
pub fn visible_menu(menu: &'static [NavNode], role: Option<Role>) -> Vec<VisibleNav> {
    menu.iter()
        .filter_map(|node| {
            if node.is_group() {
                let children: Vec<_> = node
                    .children
                    .iter()
                    .filter(|child| has_permission(child.roles, role))
                    .collect();
                (!children.is_empty()).then_some(VisibleNav { node, children })
            } else {
                has_permission(node.roles, role).then(|| VisibleNav {
                    node,
                    children: Vec::new(),
                })
            }
        })
        .collect()
}

/// Roles required for `path`, if the menu lists it.
pub fn required_roles(menu: &'static [NavNode], path: &str) -> Option<&'static [Role]> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    menu.iter().find_map(|node| {
        if node.is_group() {
            required_roles(node.children, path)
        } else {
            (node.path == Some(path)).then_some(node.roles)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MENU: &[NavNode] = &[
        NavNode::leaf("Home", "home", "/home", ALL_ROLES),
        NavNode::group(
            "Admin Only",
            "lock",
            &[
                NavNode::leaf("Audit", "", "/audit", &[Role::Admin]),
                NavNode::leaf("Keys", "", "/keys", &[Role::Admin]),
            ],
        ),
        NavNode::group(
            "Mixed",
            "mix",
            &[
                NavNode::leaf("Reports", "", "/reports", STAFF_ROLES),
                NavNode::leaf("Shifts", "", "/shifts", ALL_ROLES),
            ],
        ),
    ];

    fn labels(menu: &[VisibleNav]) -> Vec<&'static str> {
        menu.iter().map(|entry| entry.node.label).collect()
    }

    #[test]
    fn group_with_no_visible_children_is_dropped() {
        let menu = visible_menu(TEST_MENU, Some(Role::Employee));
        assert_eq!(labels(&menu), vec!["Home", "Mixed"]);

        let mixed = &menu[1];
        let children: Vec<_> = mixed.children.iter().map(|c| c.label).collect();
        assert_eq!(children, vec!["Shifts"]);
    }

    #[test]
    fn group_keeps_exactly_its_visible_children() {
        let menu = visible_menu(TEST_MENU, Some(Role::Manager));
        assert_eq!(labels(&menu), vec!["Home", "Mixed"]);
        let children: Vec<_> = menu[1].children.iter().map(|c| c.label).collect();
        assert_eq!(children, vec!["Reports", "Shifts"]);

        let menu = visible_menu(TEST_MENU, Some(Role::Admin));
        assert_eq!(labels(&menu), vec!["Home", "Admin Only", "Mixed"]);
        assert_eq!(menu[1].children.len(), 2);
    }

    #[test]
    fn no_role_sees_nothing() {
        assert!(visible_menu(TEST_MENU, None).is_empty());
        assert!(visible_menu(MENU, None).is_empty());
    }

    #[test]
    fn employee_menu() {
        let menu = visible_menu(MENU, Some(Role::Employee));
        assert_eq!(
            labels(&menu),
            vec!["Dashboard", "Core Data", "Inventory", "Invoicing", "Warehouse Transfers"]
        );

        let core: Vec<_> = menu[1].children.iter().map(|c| c.label).collect();
        assert_eq!(core, vec!["Customers"]);

        let inventory: Vec<_> = menu[2].children.iter().map(|c| c.label).collect();
        assert_eq!(inventory, vec!["Gold Stock", "Silver Stock"]);
    }

    #[test]
    fn manager_sees_user_management() {
        let menu = visible_menu(MENU, Some(Role::Manager));
        assert!(labels(&menu).contains(&"User Management"));
        assert_eq!(menu.len(), MENU.len());
    }

    #[test]
    fn required_roles_by_path() {
        assert_eq!(required_roles(MENU, "/users"), Some(STAFF_ROLES));
        assert_eq!(required_roles(MENU, "/users/"), Some(STAFF_ROLES));
        assert_eq!(required_roles(MENU, "/users?page=2"), Some(STAFF_ROLES));
        assert_eq!(required_roles(MENU, "/customers"), Some(ALL_ROLES));
        assert_eq!(required_roles(MENU, "/inventory/gold-products"), Some(STAFF_ROLES));
        assert_eq!(required_roles(MENU, "/profile"), None);
    }
}
