//! Client for the jewelry shop REST API.
//!
//! [`ApiClient`] talks HTTP and keeps the token pair fresh. [`SessionManager`]
//! layers the login/logout lifecycle on top of it.

mod client;
mod config;
mod core_data;
pub mod endpoints;
mod session;
mod token_store;
mod users;

pub use client::ApiClient;
pub use config::Config;
pub use core_data::CoreResource;
pub use session::{AuthApi, SessionManager, SessionState};
#[cfg(target_arch = "wasm32")]
pub use token_store::LocalStorageTokenStore;
pub use token_store::{MemoryTokenStore, TokenStore, default_token_store};
