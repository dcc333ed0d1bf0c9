//! Endpoint paths, relative to the configured base URL.

pub const LOGIN: &str = "/auth/login/";
pub const REFRESH: &str = "/auth/refresh/";
pub const LOGOUT: &str = "/auth/logout/";
pub const PROFILE: &str = "/auth/profile/";
pub const CHANGE_PASSWORD: &str = "/auth/change-password/";
pub const USERS: &str = "/auth/users/";

pub const BRANCHES: &str = "/core/branches/";
pub const WAREHOUSES: &str = "/core/warehouses/";
pub const VENDORS: &str = "/core/vendors/";
pub const CUSTOMERS: &str = "/core/customers/";
pub const SELLERS: &str = "/core/sellers/";
pub const WAREHOUSE_TRANSACTIONS: &str = "/core/warehouse-transactions/";

/// `{collection}{id}/`
pub fn item(collection: &str, id: i64) -> String {
    format!("{collection}{id}/")
}

/// `{collection}{id}/{action}/`
pub fn action(collection: &str, id: i64, action: &str) -> String {
    format!("{collection}{id}/{action}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_and_action_paths() {
        assert_eq!(item(USERS, 12), "/auth/users/12/");
        assert_eq!(action(USERS, 12, "toggle_status"), "/auth/users/12/toggle_status/");
        assert_eq!(item(WAREHOUSE_TRANSACTIONS, 3), "/core/warehouse-transactions/3/");
    }
}
