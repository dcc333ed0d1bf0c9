use std::env;
use types::{Result, err};
use url::Url;

/// Environment variable holding the REST API base URL.
pub const API_URL_VAR: &str = "JEWELRY_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Always ends in `/` so endpoint paths join underneath it.
    pub api_base_url: Url,
}

impl Config {
    /// Read the base URL from the runtime environment, then from the value
    /// baked in at build time (the only option in the browser), then fall back
    /// to the local development server.
    pub fn from_env() -> Result<Self> {
        let raw = env_var(API_URL_VAR)
            .or_else(|| option_env!("JEWELRY_API_URL").map(String::from))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self::with_base_url(&raw)
    }

    pub fn with_base_url(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };

        let api_base_url =
            Url::parse(&normalized).map_err(|e| err!("invalid API base URL {raw:?}: {e}"))?;
        if api_base_url.cannot_be_a_base() {
            return Err(err!("invalid API base URL {raw:?}: not a base URL"));
        }

        Ok(Self { api_base_url })
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let config = Config::with_base_url("http://localhost:8000/api").unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8000/api/");
        assert_eq!(
            config.api_base_url.join("auth/login/").unwrap().as_str(),
            "http://localhost:8000/api/auth/login/"
        );
    }

    #[test]
    fn existing_trailing_slash_is_kept() {
        let config = Config::with_base_url("https://shop.example.com/api/v2/").unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://shop.example.com/api/v2/");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Config::with_base_url("not a url").is_err());
        assert!(Config::with_base_url("mailto:ops@example.com").is_err());
    }

    #[test]
    fn default_is_local() {
        let config = Config::with_base_url(DEFAULT_API_URL).unwrap();
        assert_eq!(config.api_base_url.host_str(), Some("localhost"));
        assert_eq!(config.api_base_url.port(), Some(8000));
    }
}
