//! Device security information
//!
//! `device/internal/securityinfo` lives under the host root, authenticates
//! with an `AUTHKEY` query parameter and answers in Java-object JSON.

use airvantage_core::{ApiBase, JavaObjectFilter, QueryParams};
use airvantage_domain::{Result, SystemSecurityInfo};
use tracing::instrument;

use super::client::{require, AirVantageClient};

impl AirVantageClient {
    /// Security and communication info of the device identified by `id`
    ///
    /// `id_type` names the identifier (e.g. `IMEI`), `protocol` the
    /// communication protocol (e.g. `LWM2M`). The auth key is masked in
    /// every observed or logged URL.
    ///
    /// # Errors
    /// `InvalidArgument` for empty inputs, `Decode` when the filtered body
    /// does not match, otherwise request errors.
    #[instrument(skip(self, auth_key))]
    pub async fn get_security_info(
        &self,
        id: &str,
        id_type: &str,
        protocol: &str,
        auth_key: &str,
    ) -> Result<Vec<SystemSecurityInfo>> {
        require(id, "device id")?;
        require(id_type, "device id type")?;
        require(protocol, "protocol")?;
        require(auth_key, "auth key")?;

        let params = QueryParams::new()
            .with("id", id)
            .with("type", id_type)
            .with("protocol", protocol)
            .with("AUTHKEY", auth_key);
        let url = self.url_for(ApiBase::Device, "device/internal/securityinfo", &params);

        self.get_java(url, &JavaObjectFilter::sierra()).await
    }
}
