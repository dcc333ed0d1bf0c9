use std::sync::Arc;
use types::{
    Credentials, GENERIC_MESSAGE, PasswordChange, ProfileUpdate, Result, TokenPair, User, err,
};

use crate::{ApiClient, Config, TokenStore, default_token_store};

/// The authentication calls the session lifecycle depends on.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair>;
    /// Invalidate the stored refresh token server-side.
    async fn logout(&self) -> Result<()>;
    async fn profile(&self) -> Result<User>;
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User>;
    async fn change_password(&self, change: &PasswordChange) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Uninitialized,
    /// Restoring a persisted session on start-up.
    Loading,
    /// A login request is in flight.
    Authenticating,
    Authenticated(User),
    Anonymous,
}

impl SessionState {
    /// Still waiting to learn whether anyone is signed in.
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Uninitialized | SessionState::Loading)
    }
}

/// Owns the signed-in user and the token lifecycle.
///
/// Operations that await run on a copy taken with [`start`](Self::start) and
/// come back through [`finish`](Self::finish), which drops the copy if another
/// operation started in the meantime.
#[derive(Clone)]
pub struct SessionManager<A = ApiClient> {
    api: A,
    tokens: Arc<dyn TokenStore>,
    state: SessionState,
    epoch: u64,
}

impl SessionManager {
    /// A manager talking to the configured API, backed by the platform token store.
    pub fn connect(config: &Config) -> Self {
        let tokens = default_token_store();
        Self::new(ApiClient::new(config, tokens.clone()), tokens)
    }
}

impl<A: AuthApi> SessionManager<A> {
    pub fn new(api: A, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            state: SessionState::Uninitialized,
            epoch: 0,
        }
    }

    /// Publish `pending` and hand back the copy an operation should run on.
    pub fn start(&mut self, pending: SessionState) -> Self
    where
        A: Clone,
    {
        self.epoch += 1;
        self.state = pending;
        self.clone()
    }

    /// Adopt the outcome of an operation begun with [`start`](Self::start),
    /// unless a newer one has started since. Returns whether it was adopted.
    pub fn finish(&mut self, done: Self) -> bool {
        if done.epoch != self.epoch {
            tracing::debug!(stale = done.epoch, current = self.epoch, "dropping superseded session update");
            return false;
        }
        *self = done;
        true
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Restore a persisted session, if there is one.
    pub async fn init(&mut self) {
        let Some(access) = self.tokens.access_token() else {
            self.state = SessionState::Anonymous;
            return;
        };
        let refresh = self.tokens.refresh_token();

        self.state = SessionState::Loading;
        match self.api.profile().await {
            Ok(user) => {
                tracing::info!(username = %user.username, "restored session");
                self.state = SessionState::Authenticated(user);
            }
            Err(error) => {
                tracing::warn!(%error, "failed to fetch user profile, clearing stored tokens");
                self.tokens.clear_if_current(Some(&access), refresh.as_ref());
                self.state = SessionState::Anonymous;
            }
        }
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<User> {
        self.state = SessionState::Authenticating;

        match self.establish(credentials).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "logged in");
                self.state = SessionState::Authenticated(user.clone());
                Ok(user)
            }
            Err(mut error) => {
                tracing::info!(username = %credentials.username, %error, "login failed");
                self.tokens.clear();
                self.state = SessionState::Anonymous;
                if error.message.is_empty() || error.message == GENERIC_MESSAGE {
                    error.message = "Login failed".to_string();
                }
                Err(error)
            }
        }
    }

    async fn establish(&self, credentials: &Credentials) -> Result<User> {
        let tokens = self.api.login(credentials).await?;
        self.tokens.save(&tokens)?;
        self.api.profile().await
    }

    /// Always ends signed out, whatever the server says.
    pub async fn logout(&mut self) {
        if let Err(error) = self.api.logout().await {
            tracing::warn!(%error, "logout request failed");
        }
        self.tokens.clear();
        self.state = SessionState::Anonymous;
        tracing::info!("logged out");
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<User> {
        if !self.is_authenticated() {
            return Err(err!("not signed in"));
        }

        let user = self.api.update_profile(update).await?;
        self.state = SessionState::Authenticated(user.clone());
        Ok(user)
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        self.api.change_password(change).await
    }

    /// The server rejected the session and it could not be refreshed.
    pub fn expire(&mut self) {
        if self.is_authenticated() {
            tracing::info!("session expired");
        }
        self.epoch += 1;
        self.tokens.clear();
        self.state = SessionState::Anonymous;
    }

    /// Forget the in-memory session. Stored tokens and the server are untouched.
    pub fn teardown(&mut self) {
        self.epoch += 1;
        self.state = SessionState::Uninitialized;
    }
}
