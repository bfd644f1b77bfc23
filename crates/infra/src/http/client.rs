use std::time::Duration;

use airvantage_domain::constants::DEFAULT_TIMEOUT;
use airvantage_domain::{AirVantageError, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use url::Url;

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("airvantage-rs/", env!("CARGO_PKG_VERSION"));

/// A response whose body has been read to the end.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    pub url: Url,
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
}

/// HTTP client with a per-request timeout and no retries.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Underlying reqwest client, shared with the OAuth token exchange.
    pub fn inner(&self) -> &ReqwestClient {
        &self.client
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|err| AirVantageError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, path = %url.path(), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, path = %url.path(), status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, path = %url.path(), error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }

    /// Execute the request and read the whole body.
    pub async fn send_buffered(&self, builder: RequestBuilder) -> Result<BufferedResponse> {
        let response = self.send(builder).await?;

        let url = response.url().clone();
        let status = response.status();
        let body = response.bytes().await.map_err(|err| AirVantageError::from(InfraError::from(err)))?;

        Ok(BufferedResponse {
            url,
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.to_vec(),
        })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    follow_redirects: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            follow_redirects: true,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Token endpoints must not follow redirects.
    pub fn follow_redirects(mut self, enabled: bool) -> Self {
        self.follow_redirects = enabled;
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).user_agent(USER_AGENT).no_proxy();

        if !self.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        let client = builder.build().map_err(|err| AirVantageError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}
