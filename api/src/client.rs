use jiff::Timestamp;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::json;
use std::sync::Arc;
use types::{
    Credentials, Error, GENERIC_MESSAGE, PasswordChange, ProfileUpdate, RefreshedTokens, Result,
    TokenPair, User, err, token_expired,
};
use url::Url;

use crate::{AuthApi, Config, TokenStore, endpoints};

trait ReqwestExt {
    async fn try_send<T: DeserializeOwned>(self) -> Result<T>;
}

impl ReqwestExt for RequestBuilder {
    async fn try_send<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await.map_err(transport_error)?;
        read_json(response).await
    }
}

fn transport_error(error: reqwest::Error) -> Error {
    tracing::warn!(%error, "request failed before a response arrived");
    Error::from(GENERIC_MESSAGE)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(Error::from_response_body(status.as_u16(), &body));
    }

    // 204s and empty bodies read as `null`, which `()` and `IgnoredAny` accept.
    let body: &[u8] = if body.is_empty() { b"null" } else { &body };
    serde_json::from_slice(body).map_err(|error| {
        tracing::debug!(%error, "failed to parse response");
        Error::from(GENERIC_MESSAGE).with_status(status.as_u16())
    })
}

/// REST client for the jewelry API.
///
/// Attaches the stored access token to every call, refreshes it ahead of time
/// when it has expired, and refreshes-and-retries once on a 401.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| err!("invalid endpoint {path}: {e}"))?;

        tracing::debug!(%method, %url, "api request");
        Ok(self.client.request(method, url))
    }

    pub(crate) fn get(&self, path: impl AsRef<str>) -> Result<RequestBuilder> {
        self.request(Method::GET, path.as_ref())
    }

    pub(crate) fn post(&self, path: impl AsRef<str>) -> Result<RequestBuilder> {
        self.request(Method::POST, path.as_ref())
    }

    pub(crate) fn patch(&self, path: impl AsRef<str>) -> Result<RequestBuilder> {
        self.request(Method::PATCH, path.as_ref())
    }

    pub(crate) fn delete(&self, path: impl AsRef<str>) -> Result<RequestBuilder> {
        self.request(Method::DELETE, path.as_ref())
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.access_token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send with the bearer token and parse the JSON body.
    pub(crate) async fn call<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.execute(builder).await?;
        read_json(response).await
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        self.refresh_if_expired().await;

        let retry = builder.try_clone();
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() != StatusCode::UNAUTHORIZED || self.tokens.refresh_token().is_none() {
            return Ok(response);
        }
        let Some(retry) = retry else {
            return Ok(response);
        };

        let seen = (self.tokens.access_token(), self.tokens.refresh_token());
        match self.refresh().await {
            Ok(()) => self
                .authorize(retry)
                .send()
                .await
                .map_err(transport_error),
            Err(error) => {
                tracing::info!(%error, "token refresh failed, clearing stored tokens");
                self.tokens.clear_if_current(seen.0.as_ref(), seen.1.as_ref());
                Ok(response)
            }
        }
    }

    async fn refresh_if_expired(&self) {
        let Some(access) = self.tokens.access_token() else {
            return;
        };
        if !token_expired(&access, Timestamp::now()) || self.tokens.refresh_token().is_none() {
            return;
        }

        if let Err(error) = self.refresh().await {
            tracing::debug!(%error, "proactive token refresh failed");
        }
    }

    /// Trade the refresh token for a new access token.
    pub async fn refresh(&self) -> Result<()> {
        let refresh = self
            .tokens
            .refresh_token()
            .ok_or_else(|| err!("no refresh token"))?;

        let refreshed: RefreshedTokens = self
            .post(endpoints::REFRESH)?
            .json(&json!({ "refresh": refresh.expose_secret() }))
            .try_send()
            .await?;

        let tokens = TokenPair {
            access: refreshed.access,
            refresh: refreshed.refresh.unwrap_or(refresh),
        };
        self.tokens.save(&tokens)?;
        tracing::debug!("access token refreshed");
        Ok(())
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair> {
        self.post(endpoints::LOGIN)?
            .json(credentials)
            .try_send()
            .await
    }

    async fn logout(&self) -> Result<()> {
        let refresh = self.tokens.refresh_token();
        let body = json!({ "refresh_token": refresh.as_ref().map(|t| t.expose_secret()) });

        self.call::<IgnoredAny>(self.post(endpoints::LOGOUT)?.json(&body))
            .await
            .map(|_| ())
    }

    async fn profile(&self) -> Result<User> {
        self.call(self.get(endpoints::PROFILE)?).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.call(self.patch(endpoints::PROFILE)?.json(update)).await
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        self.call::<IgnoredAny>(self.post(endpoints::CHANGE_PASSWORD)?.json(change))
            .await
            .map(|_| ())
    }
}
