//! Operations endpoints and the poller wiring

use std::time::Duration;

use airvantage_core::{OperationSource, QueryParams, SearchCriteria};
use airvantage_domain::{Operation, Page, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::{info, instrument};

use super::client::{require, AirVantageClient, RequestBody};
use crate::errors::InfraError;

impl AirVantageClient {
    /// `GET operations/{uid}`
    ///
    /// # Errors
    /// `InvalidArgument` for an empty uid, otherwise request errors.
    #[instrument(skip(self))]
    pub async fn get_operation(&self, uid: &str) -> Result<Operation> {
        require(uid, "operation uid")?;
        self.get(self.url(&format!("operations/{uid}"), &QueryParams::new())).await
    }

    /// `GET operations`, returning the items of the first page
    ///
    /// # Errors
    /// Request errors.
    #[instrument(skip(self))]
    pub async fn find_operations(&self, criteria: &SearchCriteria) -> Result<Vec<Operation>> {
        let page: Page<Operation> = self.get(self.url("operations", &criteria.to_params())).await?;
        Ok(page.into_items())
    }

    /// `POST operations/{uid}/cancel`
    ///
    /// # Errors
    /// `InvalidArgument` for an empty uid, otherwise request errors.
    #[instrument(skip(self))]
    pub async fn cancel_operation(&self, uid: &str) -> Result<()> {
        require(uid, "operation uid")?;
        let url = self.url(&format!("operations/{uid}/cancel"), &QueryParams::new());
        self.send(Method::POST, url, RequestBody::Json(Vec::new())).await?;
        info!(uid, "Operation cancel requested");
        Ok(())
    }

    /// Raw JSON payload an operation needs signed before approval
    ///
    /// # Errors
    /// `InvalidArgument` for an empty uid, otherwise request errors.
    #[instrument(skip(self))]
    pub async fn get_operation_unsigned_payload(&self, uid: &str) -> Result<String> {
        require(uid, "operation uid")?;
        let url = self.url(&format!("operations/{uid}/unsignedpayload"), &QueryParams::new());
        Ok(self.send(Method::GET, url, RequestBody::Empty).await?.into_text())
    }

    /// Approve a signed operation
    ///
    /// `signature` is base64 encoded; `certificate_chain` is PEM.
    ///
    /// # Errors
    /// `InvalidArgument` for empty inputs, otherwise request errors.
    #[instrument(skip(self, signature, certificate_chain))]
    pub async fn approve_operation(
        &self,
        uid: &str,
        signature: &str,
        algorithm: &str,
        certificate_chain: Vec<u8>,
    ) -> Result<()> {
        require(uid, "operation uid")?;
        require(signature, "signature")?;
        require(algorithm, "signature algorithm")?;

        let cert = Part::bytes(certificate_chain)
            .file_name("cert-chain.pem")
            .mime_str("application/octet-stream")
            .map_err(InfraError::from)?;
        let form = Form::new()
            .part("cert", cert)
            .text("signature", signature.to_string())
            .text("algorithm", algorithm.to_string());

        let url = self.url(&format!("operations/{uid}/approve"), &QueryParams::new());
        self.send(Method::POST, url, RequestBody::Multipart(form)).await?;
        info!(uid, "Operation approved");
        Ok(())
    }

    /// Poll operation `uid` until it is `FINISHED`
    ///
    /// # Errors
    /// `PollTimeout` (carrying the last snapshot) once `timeout` has elapsed,
    /// or the first request error.
    pub async fn await_operation(&self, uid: &str, timeout: Duration) -> Result<Operation> {
        self.poller().await_operation(self, uid, timeout).await
    }

    /// [`await_operation`](Self::await_operation), then fail with
    /// `PartialFailure` if any target failed
    ///
    /// # Errors
    /// See `await_operation`, plus `PartialFailure`.
    pub async fn await_operation_success(&self, uid: &str, timeout: Duration) -> Result<Operation> {
        self.poller().await_success(self, uid, timeout).await
    }
}

#[async_trait]
impl OperationSource for AirVantageClient {
    async fn fetch_operation(&self, uid: &str) -> Result<Operation> {
        self.get_operation(uid).await
    }
}
