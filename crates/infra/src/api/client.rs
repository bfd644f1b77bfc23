//! AirVantage API client
//!
//! Every call goes through the same pipeline: URL builder → authenticated
//! request → fully buffered response → classifier → decoder.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use airvantage_core::{
    ApiBase, JavaObjectFilter, OperationPoller, Payload, QueryParams, ResponseClassifier,
    ResponseObserver, TracingObserver, UrlBuilder,
};
use airvantage_domain::constants::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, MASKED_PARAMS};
use airvantage_domain::{AirVantageConfig, AirVantageError, Result};
use reqwest::multipart::Form;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument};
use url::Url;

use super::auth::{AccessTokenProvider, OAuthTokenProvider};
use crate::http::HttpClient;

/// Request body variants sent by the endpoints
pub enum RequestBody {
    Empty,
    Json(Vec<u8>),
    Multipart(Form),
    Raw { content_type: &'static str, data: Vec<u8> },
}

impl RequestBody {
    /// Serialize `value` as a JSON body
    ///
    /// # Errors
    /// Returns `AirVantageError::InvalidArgument` if `value` cannot be
    /// serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_vec(value)
            .map(Self::Json)
            .map_err(|e| AirVantageError::InvalidArgument(format!("Failed to serialize body: {e}")))
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Json(data) => write!(f, "Json({} bytes)", data.len()),
            Self::Multipart(_) => f.write_str("Multipart"),
            Self::Raw { content_type, data } => write!(f, "Raw({content_type}, {} bytes)", data.len()),
        }
    }
}

pub(crate) fn require(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AirVantageError::InvalidArgument(format!("{what} is empty")));
    }
    Ok(())
}

/// Authenticated client for one AirVantage host
pub struct AirVantageClient {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    urls: UrlBuilder,
    classifier: ResponseClassifier,
    poller: OperationPoller,
    timeout: Duration,
}

impl fmt::Debug for AirVantageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirVantageClient")
            .field("root", &self.urls.root().as_str())
            .field("company_uid", &self.urls.company_uid())
            .field("debug", &self.classifier.debug())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AirVantageClient {
    /// Create a builder for fluent configuration
    pub fn builder(host: impl Into<String>) -> AirVantageClientBuilder {
        AirVantageClientBuilder::new(host)
    }

    /// Log in with the OAuth settings of `config` and return a ready client
    ///
    /// The first token is requested eagerly so bad credentials fail here.
    ///
    /// # Errors
    /// Returns `Config` for an invalid host, `Auth` or `Network` when the
    /// token cannot be obtained.
    pub async fn connect(config: &AirVantageConfig) -> Result<Self> {
        let urls = UrlBuilder::from_host(&config.host)?;
        let provider = OAuthTokenProvider::from_config(&urls, config)?;
        provider.login().await?;
        info!(host = %config.host, company = ?config.company_uid, "Logged in to AirVantage");

        Self::builder(config.host.clone())
            .auth(Arc::new(provider))
            .company_uid(config.company_uid.clone())
            .debug(config.debug)
            .timeout(config.timeout())
            .poll_interval(config.poll_interval())
            .build()
    }

    /// Bind (or unbind) the tenant injected as `company`
    pub fn set_company_uid(&mut self, company_uid: Option<String>) {
        self.urls.set_company_uid(company_uid);
    }

    pub fn company_uid(&self) -> Option<&str> {
        self.urls.company_uid()
    }

    /// Toggle observation of raw responses
    pub fn set_debug(&mut self, debug: bool) {
        self.classifier.set_debug(debug);
    }

    /// Replace the sink that receives raw responses in debug mode
    pub fn set_observer(&mut self, observer: Arc<dyn ResponseObserver>) {
        self.classifier.set_observer(observer);
    }

    /// Per-request timeout
    ///
    /// # Errors
    /// Returns `InvalidArgument` for a zero timeout.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        if timeout.is_zero() {
            return Err(AirVantageError::InvalidArgument("timeout must be greater than zero".to_string()));
        }
        self.timeout = timeout;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poller(&self) -> &OperationPoller {
        &self.poller
    }

    /// API v1 URL for `path`
    pub fn url(&self, path: &str, params: &QueryParams) -> Url {
        self.urls.v1(path, params)
    }

    /// API v2 URL for `path`
    pub fn url_v2(&self, path: &str, params: &QueryParams) -> Url {
        self.urls.v2(path, params)
    }

    pub(crate) fn url_for(&self, base: ApiBase, path: &str, params: &QueryParams) -> Url {
        self.urls.build(base, path, params)
    }

    /// Send one authenticated request and classify the response
    ///
    /// # Errors
    /// `Network` when no response arrives, otherwise whatever the classifier
    /// reports for the status and body.
    #[instrument(skip(self, method, url, body), fields(method = %method, path = %url.path()))]
    pub async fn send(&self, method: Method, url: Url, body: RequestBody) -> Result<Payload> {
        if self.classifier.debug() {
            let masked = airvantage_core::mask_url_params(url.as_str(), MASKED_PARAMS);
            debug!(url = %masked, body = ?body, "AirVantage request");
        }

        let token = self.auth.access_token().await?;
        let mut request = self.http.request(method, url.clone()).bearer_auth(token).timeout(self.timeout);

        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(data) => request.header("Content-Type", "application/json").body(data),
            RequestBody::Multipart(form) => request.multipart(form),
            RequestBody::Raw { content_type, data } => request.header("Content-Type", content_type).body(data),
        };

        let response = self.http.send_buffered(request).await?;
        self.classifier.classify(&url, response.status, &response.reason, response.body)
    }

    /// GET and decode
    ///
    /// # Errors
    /// See [`AirVantageClient::send`]; `Decode` when the body does not match
    /// `T`.
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.send(Method::GET, url, RequestBody::Empty).await?.decode()
    }

    /// POST a JSON body and decode the response
    ///
    /// # Errors
    /// See [`AirVantageClient::get`].
    pub async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, url, RequestBody::json(body)?).await?.decode()
    }

    /// PUT a JSON body and decode the response
    ///
    /// # Errors
    /// See [`AirVantageClient::get`].
    pub async fn put_json<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, url, RequestBody::json(body)?).await?.decode()
    }

    /// GET a Java-object JSON document and decode it after stripping class
    /// tags
    ///
    /// # Errors
    /// See [`AirVantageClient::get`].
    pub async fn get_java<T: DeserializeOwned>(&self, url: Url, filter: &JavaObjectFilter) -> Result<T> {
        self.send(Method::GET, url, RequestBody::Empty).await?.decode_java(filter)
    }
}

/// Builder for [`AirVantageClient`]
pub struct AirVantageClientBuilder {
    host: String,
    auth: Option<Arc<dyn AccessTokenProvider>>,
    company_uid: Option<String>,
    debug: bool,
    observer: Arc<dyn ResponseObserver>,
    timeout: Duration,
    poll_interval: Duration,
}

impl AirVantageClientBuilder {
    fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            auth: None,
            company_uid: None,
            debug: false,
            observer: Arc::new(TracingObserver),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn company_uid(mut self, company_uid: Option<String>) -> Self {
        self.company_uid = company_uid;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// # Errors
    /// Returns `AirVantageError::Config` without a token provider, for a zero
    /// timeout or poll interval, for an invalid host, or when the HTTP client
    /// cannot be built.
    pub fn build(self) -> Result<AirVantageClient> {
        let auth = self
            .auth
            .ok_or_else(|| AirVantageError::Config("an access token provider is required".to_string()))?;
        if self.timeout.is_zero() {
            return Err(AirVantageError::Config("timeout must be greater than zero".to_string()));
        }
        let poller = OperationPoller::new(self.poll_interval)
            .map_err(|_| AirVantageError::Config("poll interval must be greater than zero".to_string()))?;

        let mut urls = UrlBuilder::from_host(&self.host)?;
        urls.set_company_uid(self.company_uid);

        let http = HttpClient::builder().timeout(self.timeout).build()?;

        Ok(AirVantageClient {
            http,
            auth,
            urls,
            classifier: ResponseClassifier::new(self.observer, self.debug),
            poller,
            timeout: self.timeout,
        })
    }
}
