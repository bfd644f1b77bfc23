//! Client configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS};
use crate::errors::{AirVantageError, Result};

/// Connection settings for one AirVantage tenant
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirVantageConfig {
    /// Server host, optionally prefixed with `http://` or `https://`.
    pub host: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    /// Resource-owner credentials. When absent the client-credentials grant
    /// is used instead.
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Tenant injected as `company` on every request.
    #[serde(default)]
    pub company_uid: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl fmt::Debug for AirVantageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirVantageConfig")
            .field("host", &self.host)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("company_uid", &self.company_uid)
            .field("timeout_secs", &self.timeout_secs)
            .field("debug", &self.debug)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl AirVantageConfig {
    pub fn new(
        host: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            login: None,
            password: None,
            company_uid: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debug: false,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }

    pub fn with_credentials(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_company(mut self, company_uid: impl Into<String>) -> Self {
        self.company_uid = Some(company_uid.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Reject settings the client cannot run with
    ///
    /// # Errors
    /// Returns `AirVantageError::Config` when the timeout or the poll
    /// interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(AirVantageError::Config("timeout_secs must be greater than zero".to_string()));
        }
        if self.poll_interval_secs == 0 {
            return Err(AirVantageError::Config("poll_interval_secs must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Login and password, only when both are set.
    pub fn resource_owner(&self) -> Option<(&str, &str)> {
        match (self.login.as_deref(), self.password.as_deref()) {
            (Some(login), Some(password)) => Some((login, password)),
            _ => None,
        }
    }
}
