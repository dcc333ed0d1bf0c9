use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use types::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, Result, TokenPair};

/// Durable key/value storage for the token pair.
///
/// Every outbound request reads from it; login, refresh and logout write.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<SecretString>;
    fn set(&self, key: &str, value: &SecretString) -> Result<()>;
    fn remove(&self, key: &str);

    fn access_token(&self) -> Option<SecretString> {
        self.get(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<SecretString> {
        self.get(REFRESH_TOKEN_KEY)
    }

    fn save(&self, tokens: &TokenPair) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        self.set(REFRESH_TOKEN_KEY, &tokens.refresh)
    }

    fn clear(&self) {
        self.remove(ACCESS_TOKEN_KEY);
        self.remove(REFRESH_TOKEN_KEY);
    }

    /// Clear the pair unless both tokens were replaced since `access` and
    /// `refresh` were read, as a login does.
    fn clear_if_current(&self, access: Option<&SecretString>, refresh: Option<&SecretString>) -> bool {
        let unchanged = |stored: Option<SecretString>, seen: Option<&SecretString>| {
            matches!((stored, seen), (Some(a), Some(b)) if a.expose_secret() == b.expose_secret())
        };

        if unchanged(self.access_token(), access) || unchanged(self.refresh_token(), refresh) {
            self.clear();
            true
        } else {
            tracing::debug!("stored tokens were replaced, keeping them");
            false
        }
    }
}

/// Process-local store for tests and non-browser targets.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<String, SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: &TokenPair) -> Self {
        let store = Self::new();
        // Writes to memory cannot fail.
        let _ = store.save(tokens);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<SecretString> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &SecretString) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Browser `localStorage`, looked up on every call.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageTokenStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageTokenStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl TokenStore for LocalStorageTokenStore {
    fn get(&self, key: &str) -> Option<SecretString> {
        Self::storage()?
            .get_item(key)
            .ok()
            .flatten()
            .map(SecretString::from)
    }

    fn set(&self, key: &str, value: &SecretString) -> Result<()> {
        let storage = Self::storage().ok_or_else(|| types::err!("localStorage is unavailable"))?;
        storage
            .set_item(key, value.expose_secret())
            .map_err(|_| types::err!("failed to write {key} to localStorage"))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// The persistent store for the current target.
pub fn default_token_store() -> Arc<dyn TokenStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(LocalStorageTokenStore)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(MemoryTokenStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_clear_both_tokens() {
        let store = MemoryTokenStore::new();
        assert!(store.access_token().is_none());

        store.save(&TokenPair::new("a", "r")).unwrap();
        assert_eq!(store.access_token().unwrap().expose_secret(), "a");
        assert_eq!(store.refresh_token().unwrap().expose_secret(), "r");

        store.clear();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn clear_if_current_keeps_a_newer_login() {
        let store = MemoryTokenStore::with_tokens(&TokenPair::new("old-a", "old-r"));
        let (access, refresh) = (store.access_token(), store.refresh_token());

        store.save(&TokenPair::new("new-a", "new-r")).unwrap();
        assert!(!store.clear_if_current(access.as_ref(), refresh.as_ref()));
        assert_eq!(store.access_token().unwrap().expose_secret(), "new-a");

        let (access, refresh) = (store.access_token(), store.refresh_token());
        store.set("access_token", &SecretString::from("refreshed-a".to_string())).unwrap();
        assert!(store.clear_if_current(access.as_ref(), refresh.as_ref()));
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn uses_the_persisted_key_names() {
        let store = MemoryTokenStore::with_tokens(&TokenPair::new("a", "r"));
        assert!(store.get("access_token").is_some());
        assert!(store.get("refresh_token").is_some());
    }
}
