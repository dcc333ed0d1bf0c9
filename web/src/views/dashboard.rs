use crate::Route;
use api::CoreResource;
use dioxus::prelude::*;
use types::{PageQuery, STAFF_ROLES, has_permission};
use ui::use_session;

#[component]
pub fn Dashboard() -> Element {
    let session = use_session();
    let mut total_users = use_signal(|| None::<u64>);
    let mut active_users = use_signal(|| None::<u64>);
    let mut branches = use_signal(|| None::<u64>);
    let mut warehouses = use_signal(|| None::<u64>);

    // A count the role may not read stays blank.
    use_effect(move || {
        let api = session.api();
        spawn(async move {
            let active = PageQuery::count_only().with_filter("is_active", "true");
            total_users.set(api.list_users(&PageQuery::count_only()).await.ok().map(|p| p.count));
            active_users.set(api.list_users(&active).await.ok().map(|p| p.count));
            branches.set(api.count_records(CoreResource::Branches).await.ok());
            warehouses.set(api.count_records(CoreResource::Warehouses).await.ok());
        });
    });

    let Some(user) = session.user() else {
        return rsx! {};
    };
    let is_staff = has_permission(STAFF_ROLES, user.role);
    let role = user.role.map(|r| r.to_string()).unwrap_or_else(|| "No role".to_string());

    rsx! {
        div {
            div { class: "page-header welcome-banner",
                h1 { class: "page-title", "Welcome back, {user.username}!" }
                p { class: "page-subtitle",
                    "{role}"
                    if let Some(branch) = &user.branch_name {
                        " · {branch}"
                    }
                }
            }
            div { class: "stats-grid",
                StatCard { title: "Total Users", value: total_users() }
                StatCard { title: "Active Users", value: active_users() }
                StatCard { title: "Branches", value: branches() }
                StatCard { title: "Warehouses", value: warehouses() }
            }
            h2 { class: "section-header", "Quick Actions" }
            div { class: "dashboard-grid",
                if is_staff {
                    Link {
                        to: Route::Users {},
                        class: "dashboard-card",
                        h3 { class: "dashboard-card-title", "Manage Users" }
                        p { class: "dashboard-card-desc", "Create accounts, assign roles and branches." }
                    }
                    Link {
                        to: Route::Branches {},
                        class: "dashboard-card",
                        h3 { class: "dashboard-card-title", "Branches" }
                        p { class: "dashboard-card-desc", "Review shop locations." }
                    }
                }
                Link {
                    to: Route::Customers {},
                    class: "dashboard-card",
                    h3 { class: "dashboard-card-title", "Customers" }
                    p { class: "dashboard-card-desc", "Look up customer records." }
                }
                Link {
                    to: Route::Invoices { kind: "gold".to_string() },
                    class: "dashboard-card",
                    h3 { class: "dashboard-card-title", "Gold Invoices" }
                    p { class: "dashboard-card-desc", "Sales of gold items." }
                }
                Link {
                    to: Route::WarehouseTransactions {},
                    class: "dashboard-card",
                    h3 { class: "dashboard-card-title", "Warehouse Transfers" }
                    p { class: "dashboard-card-desc", "Stock moving between warehouses." }
                }
            }
        }
    }
}

#[component]
fn StatCard(title: &'static str, #[props(!optional)] value: Option<u64>) -> Element {
    rsx! {
        div { class: "stat-card",
            div { class: "stat-card-title", "{title}" }
            div { class: "stat-card-value",
                {
                    match value {
                        Some(value) => rsx! { "{value}" },
                        None => rsx! { "-" },
                    }
                }
            }
        }
    }
}
