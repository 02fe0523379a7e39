use crate::services::token_cache::{TokenCache, TokenCacheError, TokenInfo};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during the OAuth flow
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Token endpoint returned {status}: {message}")]
    TokenEndpoint { status: u16, message: String },

    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error(transparent)]
    Cache(#[from] TokenCacheError),
}

/// OAuth application credentials
#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
}

/// Raw response of the accounts service token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    expires_in: i64,
    refresh_token: Option<String>,
    scope: Option<String>,
}

impl TokenResponse {
    fn into_token_info(self, previous_refresh: Option<String>) -> TokenInfo {
        TokenInfo {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_in: self.expires_in,
            // Refresh responses usually omit the refresh token
            refresh_token: self.refresh_token.or(previous_refresh),
            scope: self.scope,
            expires_at: chrono::Utc::now().timestamp() + self.expires_in,
        }
    }
}

/// Authorization-code flow against the Spotify accounts service
///
/// Handles:
/// - Building the authorize redirect
/// - Exchanging the callback code for a token
/// - Refreshing expired tokens from the cache
pub struct SpotifyAuth {
    accounts_base: String,
    credentials: SpotifyCredentials,
    client: Client,
    cache: TokenCache,
}

impl SpotifyAuth {
    pub fn new(
        accounts_base: String,
        credentials: SpotifyCredentials,
        cache: TokenCache,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            accounts_base,
            credentials,
            client,
            cache,
        })
    }

    /// URL the user is redirected to for granting access
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}&show_dialog=false",
            self.accounts_base.trim_end_matches('/'),
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(&self.credentials.redirect_uri),
            urlencoding::encode(&self.credentials.scope),
        )
    }

    /// Exchange an authorization code and cache the resulting token
    pub async fn exchange_code(&self, code: &str) -> Result<TokenInfo, AuthError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];

        let token = self.request_token(&form).await?.into_token_info(None);
        self.cache.store(token.clone()).await?;

        tracing::info!("Authorized with Spotify, token valid for {}s", token.expires_in);
        Ok(token)
    }

    /// Refresh a token and cache the result
    pub async fn refresh(&self, token: &TokenInfo) -> Result<TokenInfo, AuthError> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or(AuthError::MissingRefreshToken)?;

        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let refreshed = self
            .request_token(&form)
            .await?
            .into_token_info(token.refresh_token.clone());
        self.cache.store(refreshed.clone()).await?;

        tracing::debug!("Refreshed Spotify access token");
        Ok(refreshed)
    }

    /// Valid access token from the cache, refreshing it when expired
    ///
    /// Returns `None` when the user has not logged in yet or the refresh
    /// failed; failures are logged.
    pub async fn cached_token(&self) -> Option<String> {
        let token = match self.cache.get().await {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable token cache {}: {}", self.cache.path().display(), e);
                return None;
            }
        };

        if !token.is_expired() {
            return Some(token.access_token);
        }

        match self.refresh(&token).await {
            Ok(refreshed) => Some(refreshed.access_token),
            Err(e) => {
                tracing::warn!("Failed to refresh Spotify token: {}", e);
                None
            }
        }
    }

    /// Whether an unexpired token is cached. Never refreshes.
    pub async fn has_valid_token(&self) -> bool {
        matches!(self.cache.get().await, Ok(Some(token)) if !token.is_expired())
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let url = format!("{}/api/token", self.accounts_base.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Token request failed: {} - {}", status, message);
            return Err(AuthError::TokenEndpoint { status, message });
        }

        Ok(response.json().await?)
    }
}
