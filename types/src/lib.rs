mod access;
mod error;
pub mod format;
pub mod nav;
pub mod pagination;
mod record;
mod session;
mod user_form;

pub use access::{ALL_ROLES, Guard, Role, STAFF_ROLES, guard, has_permission};
pub use error::{Error, FieldErrors, GENERIC_MESSAGE, Result};
pub use pagination::{FetchTicket, Page, PageQuery, PageSize, PageState};
pub use record::{Record, record_payload, scalar_columns};
pub use session::{
    ACCESS_TOKEN_KEY, Credentials, PasswordChange, ProfileUpdate, REFRESH_TOKEN_KEY,
    RefreshedTokens, TokenPair, User, token_expired, token_expiry,
};
pub use user_form::{MIN_PASSWORD_LEN, SetPassword, StatusFilter, UserForm, UserPayload};
