//! API authentication with OAuth token management
//!
//! Tokens are obtained with the resource-owner password grant (or the
//! client-credentials grant when no user is configured) against
//! `<host>/api/oauth/token`, cached, and refreshed when they expire.

use std::fmt;
use std::time::{Duration, Instant};

use airvantage_core::UrlBuilder;
use airvantage_domain::{AirVantageConfig, Result};
use async_trait::async_trait;
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{
    AuthUrl, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RefreshToken,
    ResourceOwnerPassword, ResourceOwnerUsername, TokenResponse, TokenUrl,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Tokens are renewed this long before their announced expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    ///
    /// This method should handle token refresh if needed.
    async fn access_token(&self) -> Result<String>;
}

/// Provider for a token obtained out of band
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider").field("token", &"***").finish()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// OAuth grant used to obtain fresh tokens
#[derive(Clone)]
pub enum Grant {
    /// Resource-owner password credentials
    Password { login: String, password: String },
    /// Client credentials only
    ClientCredentials,
}

impl fmt::Debug for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password { login, .. } => {
                f.debug_struct("Password").field("login", login).finish_non_exhaustive()
            }
            Self::ClientCredentials => f.write_str("ClientCredentials"),
        }
    }
}

struct CachedToken {
    access: String,
    refresh: Option<RefreshToken>,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn from_response(response: &BasicTokenResponse) -> Self {
        Self {
            access: response.access_token().secret().clone(),
            refresh: response.refresh_token().cloned(),
            expires_at: response.expires_in().map(|ttl| Instant::now() + ttl),
        }
    }

    fn is_fresh(&self) -> bool {
        self.expires_at.map_or(true, |deadline| Instant::now() + EXPIRY_MARGIN < deadline)
    }
}

/// Token provider backed by the AirVantage OAuth endpoints
pub struct OAuthTokenProvider {
    client: ConfiguredClient,
    http: HttpClient,
    grant: Grant,
    cache: Mutex<Option<CachedToken>>,
}

impl fmt::Debug for OAuthTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokenProvider").field("grant", &self.grant).finish_non_exhaustive()
    }
}

impl OAuthTokenProvider {
    /// Create a provider for the host in `urls`
    ///
    /// # Errors
    /// Returns `AirVantageError::Config` if the OAuth endpoints or the HTTP
    /// client cannot be built.
    pub fn new(
        urls: &UrlBuilder,
        client_id: &str,
        client_secret: &str,
        grant: Grant,
        timeout: Duration,
    ) -> Result<Self> {
        let auth_url = AuthUrl::new(urls.auth_url()).map_err(InfraError::from)?;
        let token_url = TokenUrl::new(urls.token_url()).map_err(InfraError::from)?;

        let client = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url);

        let http = HttpClient::builder().timeout(timeout).follow_redirects(false).build()?;

        Ok(Self { client, http, grant, cache: Mutex::new(None) })
    }

    /// Create a provider from client configuration
    ///
    /// Uses the password grant when both login and password are set.
    ///
    /// # Errors
    /// See [`OAuthTokenProvider::new`].
    pub fn from_config(urls: &UrlBuilder, config: &AirVantageConfig) -> Result<Self> {
        let grant = match config.resource_owner() {
            Some((login, password)) => {
                Grant::Password { login: login.to_string(), password: password.to_string() }
            }
            None => Grant::ClientCredentials,
        };
        Self::new(urls, &config.client_id, &config.client_secret, grant, config.timeout())
    }

    /// Run the configured grant, replacing any cached token
    ///
    /// # Errors
    /// Returns `AirVantageError::Auth` when the server rejects the grant and
    /// `AirVantageError::Network` when it cannot be reached.
    pub async fn login(&self) -> Result<()> {
        let token = self.request_token().await?;
        *self.cache.lock().await = Some(token);
        Ok(())
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let response = match &self.grant {
            Grant::Password { login, password } => {
                debug!(login = %login, "Requesting token with password grant");
                let username = ResourceOwnerUsername::new(login.clone());
                let password = ResourceOwnerPassword::new(password.clone());
                self.client
                    .exchange_password(&username, &password)
                    .request_async(self.http.inner())
                    .await
            }
            Grant::ClientCredentials => {
                debug!("Requesting token with client credentials grant");
                self.client.exchange_client_credentials().request_async(self.http.inner()).await
            }
        }
        .map_err(InfraError::from)?;

        info!("OAuth token acquired");
        Ok(CachedToken::from_response(&response))
    }

    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<CachedToken> {
        let response = self
            .client
            .exchange_refresh_token(refresh_token)
            .request_async(self.http.inner())
            .await
            .map_err(InfraError::from)?;

        let mut token = CachedToken::from_response(&response);
        // Servers may omit the refresh token when it is unchanged
        if token.refresh.is_none() {
            token.refresh = Some(refresh_token.clone());
        }
        debug!("OAuth token refreshed");
        Ok(token)
    }
}

#[async_trait]
impl AccessTokenProvider for OAuthTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;

        if let Some(token) = cache.as_ref().filter(|token| token.is_fresh()) {
            return Ok(token.access.clone());
        }

        let refreshed = match cache.as_ref().and_then(|token| token.refresh.clone()) {
            Some(refresh_token) => match self.refresh(&refresh_token).await {
                Ok(token) => Some(token),
                Err(err) => {
                    warn!(error = %err, "Token refresh failed, requesting a new token");
                    None
                }
            },
            None => None,
        };

        let token = match refreshed {
            Some(token) => token,
            None => self.request_token().await?,
        };

        let access = token.access.clone();
        *cache = Some(token);
        Ok(access)
    }
}
