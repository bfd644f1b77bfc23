//! Endpoint URL composition
//!
//! Every request URL is a base (API v1, API v2 or the device root) plus a
//! relative path plus query parameters. When the client is bound to a tenant
//! the `company` parameter is injected unless the caller already set it.

use std::fmt::Display;

use airvantage_domain::constants::{API_V1_PATH, API_V2_PATH, COMPANY_PARAM, MASK, OAUTH_PATH};
use airvantage_domain::{AirVantageError, Result};
use url::Url;

/// Base a relative path is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiBase {
    /// `/api/v1/`
    V1,
    /// `/api/v2/`
    V2,
    /// Host root, used by the `device/...` endpoints
    Device,
}

/// Ordered query parameters
///
/// Values are rendered with `Display`, so numbers, booleans and
/// [`Timestamp`](airvantage_domain::Timestamp)s can be passed as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.push(key, value);
        self
    }

    /// Append a parameter only when a value is present
    pub fn with_opt<V: Display>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Display) {
        self.0.push((key.into(), value.to_string()));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}

/// Builds absolute request URLs for one host
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    root: Url,
    v1: Url,
    v2: Url,
    company_uid: Option<String>,
}

impl UrlBuilder {
    /// Parse a host such as `eu.airvantage.net`, `https://eu.airvantage.net`
    /// or `http://localhost:8080`. The scheme defaults to `https`.
    ///
    /// # Errors
    /// Returns `AirVantageError::Config` when the host does not form a valid
    /// URL.
    pub fn from_host(host: &str) -> Result<Self> {
        let (scheme, bare) = match host.strip_prefix("http://") {
            Some(rest) => ("http", rest),
            None => ("https", host.strip_prefix("https://").unwrap_or(host)),
        };
        let bare = bare.trim_end_matches('/');
        if bare.is_empty() {
            return Err(AirVantageError::Config("host must not be empty".to_string()));
        }

        let root = Url::parse(&format!("{scheme}://{bare}/"))
            .map_err(|e| AirVantageError::Config(format!("Invalid host '{host}': {e}")))?;
        if root.cannot_be_a_base() || root.host_str().is_none() {
            return Err(AirVantageError::Config(format!("Invalid host '{host}'")));
        }

        let v1 = with_path(&root, API_V1_PATH);
        let v2 = with_path(&root, API_V2_PATH);

        Ok(Self { root, v1, v2, company_uid: None })
    }

    /// Bind (or unbind) the tenant injected as `company`
    pub fn set_company_uid(&mut self, company_uid: Option<String>) {
        self.company_uid = company_uid.filter(|uid| !uid.is_empty());
    }

    pub fn company_uid(&self) -> Option<&str> {
        self.company_uid.as_deref()
    }

    /// Host root, e.g. `https://eu.airvantage.net/`
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// `<host>/api/oauth/token`
    pub fn token_url(&self) -> String {
        with_path(&self.root, &format!("{OAUTH_PATH}token")).into()
    }

    /// `<host>/api/oauth/auth`
    pub fn auth_url(&self) -> String {
        with_path(&self.root, &format!("{OAUTH_PATH}auth")).into()
    }

    /// Resolve `path` against `base` and attach the query parameters
    ///
    /// A leading `/` on `path` is ignored: paths are always relative to the
    /// base.
    pub fn build(&self, base: ApiBase, path: &str, params: &QueryParams) -> Url {
        let base_url = match base {
            ApiBase::V1 => &self.v1,
            ApiBase::V2 => &self.v2,
            ApiBase::Device => &self.root,
        };
        let full_path = format!("{}{}", base_url.path(), path.trim_start_matches('/'));
        let mut url = with_path(base_url, &full_path);

        let company = self.company_uid.as_deref().filter(|_| !params.contains(COMPANY_PARAM));
        if company.is_some() || !params.is_empty() {
            let mut query = url.query_pairs_mut();
            if let Some(company) = company {
                query.append_pair(COMPANY_PARAM, company);
            }
            for (key, value) in params.iter() {
                query.append_pair(key, value);
            }
        }

        url
    }

    /// Shorthand for `build(ApiBase::V1, ..)`
    pub fn v1(&self, path: &str, params: &QueryParams) -> Url {
        self.build(ApiBase::V1, path, params)
    }

    /// Shorthand for `build(ApiBase::V2, ..)`
    pub fn v2(&self, path: &str, params: &QueryParams) -> Url {
        self.build(ApiBase::V2, path, params)
    }
}

fn with_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    url.set_path(path);
    url.set_query(None);
    url
}

/// Replace the values of the given query parameters with `***`
///
/// Works on the raw string so the rest of the URL is left byte-for-byte
/// untouched.
pub fn mask_url_params(raw_url: &str, masked: &[&str]) -> String {
    let Some((head, query)) = raw_url.split_once('?') else {
        return raw_url.to_string();
    };
    let (query, fragment) = match query.split_once('#') {
        Some((query, fragment)) => (query, Some(fragment)),
        None => (query, None),
    };

    let masked_query: Vec<String> = query
        .split('&')
        .map(|pair| {
            let key = pair.split_once('=').map_or(pair, |(key, _)| key);
            if masked.contains(&key) {
                format!("{key}={MASK}")
            } else {
                pair.to_string()
            }
        })
        .collect();

    let mut out = format!("{head}?{}", masked_query.join("&"));
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
