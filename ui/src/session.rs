use api::{ApiClient, Config, SessionManager, SessionState};
use dioxus::prelude::*;
use types::{Credentials, PasswordChange, ProfileUpdate, Result, User};

/// The app-wide session. Use `use_session()` to access it.
///
/// Async operations publish their pending state, run on a copy of the manager
/// and write it back when they finish, so no signal borrow is held across an
/// await. A copy that finishes after a newer operation started is dropped.
#[derive(Clone, Copy)]
pub struct Session(Signal<SessionManager>);

impl Session {
    pub fn state(&self) -> SessionState {
        self.0.read().state().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.0.read().user().cloned()
    }

    /// The API client sharing this session's tokens.
    pub fn api(&self) -> ApiClient {
        self.0.peek().api().clone()
    }

    /// Publish `pending` and take the copy an operation runs on.
    fn start(&mut self, pending: SessionState) -> SessionManager {
        self.0.write().start(pending)
    }

    /// Write the copy back, unless a newer operation has started since.
    fn finish(&mut self, done: SessionManager) {
        self.0.write().finish(done);
    }

    pub async fn init(mut self) {
        let mut manager = self.start(SessionState::Loading);
        manager.init().await;
        self.finish(manager);
    }

    pub async fn login(mut self, credentials: Credentials) -> Result<User> {
        let mut manager = self.start(SessionState::Authenticating);
        let outcome = manager.login(&credentials).await;
        self.finish(manager);
        outcome
    }

    pub async fn logout(mut self) {
        let current = self.0.peek().state().clone();
        let mut manager = self.start(current);
        manager.logout().await;
        self.finish(manager);
    }

    pub async fn update_profile(mut self, update: ProfileUpdate) -> Result<User> {
        let current = self.0.peek().state().clone();
        let mut manager = self.start(current);
        let outcome = manager.update_profile(&update).await;
        self.finish(manager);
        outcome
    }

    pub async fn change_password(self, change: PasswordChange) -> Result<()> {
        let manager = self.0.peek().clone();
        manager.change_password(&change).await
    }

    pub fn expire(mut self) {
        self.0.write().expire();
    }
}

pub fn use_session() -> Session {
    use_context::<Session>()
}

/// Owns the session for everything below it and restores any stored login on mount.
#[component]
pub fn SessionProvider(config: Config, children: Element) -> Element {
    let session = use_context_provider(|| Session(Signal::new(SessionManager::connect(&config))));

    use_effect(move || {
        spawn(async move {
            session.init().await;
        });
    });

    use_drop(move || {
        let mut session = session;
        match session.0.try_write() {
            Ok(mut manager) => manager.teardown(),
            Err(e) => tracing::debug!("session already dropped: {e}"),
        }
    });

    rsx! { {children} }
}
