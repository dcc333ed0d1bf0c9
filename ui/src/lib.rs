//! Dioxus building blocks shared by the console's views.

mod components;
mod pagination;
mod session;

pub use components::{AccessDenied, FieldError, FieldErrorList, LoadingSpinner};
pub use pagination::{Paginated, Pagination, use_pagination};
pub use session::{Session, SessionProvider, use_session};
