//! Systems endpoints

use std::collections::HashMap;
use std::time::Duration;

use airvantage_core::{ImportBatch, QueryParams, SearchCriteria};
use airvantage_domain::constants::DEFAULT_IMPORT_TIMEOUT;
use airvantage_domain::{
    AirVantageError, DataAggregate, ImportSystemsDefaults, Operation, OperationRef, Page, Result,
    System, Timestamp, TsValue,
};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::client::{require, AirVantageClient, RequestBody};
use crate::errors::InfraError;

/// What to remove along with a system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    pub delete_gateway: bool,
    pub delete_subscription: bool,
}

#[derive(Serialize)]
struct SystemSelection<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    uids: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a [String]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplySettings<'a> {
    systems: SystemSelection<'a>,
    template_name: &'a str,
}

#[derive(Serialize)]
struct InstallApplication<'a> {
    systems: SystemSelection<'a>,
    application: &'a str,
}

impl AirVantageClient {
    /// `GET systems/{uid}`
    ///
    /// # Errors
    /// `InvalidArgument` for an empty uid, otherwise request errors.
    #[instrument(skip(self))]
    pub async fn find_system_by_uid(&self, uid: &str) -> Result<System> {
        require(uid, "system uid")?;
        self.get(self.url(&format!("systems/{uid}"), &QueryParams::new())).await
    }

    /// `GET systems`, returning the items of the first page
    ///
    /// # Errors
    /// Request errors.
    #[instrument(skip(self))]
    pub async fn find_systems(&self, criteria: &SearchCriteria) -> Result<Vec<System>> {
        let page: Page<System> = self.get(self.url("systems", &criteria.to_params())).await?;
        Ok(page.into_items())
    }

    /// First system named `name`, or `None`
    ///
    /// `fields` optionally restricts the returned fields.
    ///
    /// # Errors
    /// Request errors.
    pub async fn find_system_by_name(&self, name: &str, fields: Option<&str>) -> Result<Option<System>> {
        require(name, "system name")?;
        let mut criteria = SearchCriteria::new().filter("name", name).size(1);
        if let Some(fields) = fields {
            criteria = criteria.fields(fields);
        }
        Ok(self.find_systems(&criteria).await?.into_iter().next())
    }

    /// `POST systems`; `name` and `gateway` are required
    ///
    /// # Errors
    /// `InvalidArgument` when a required field is missing, otherwise request
    /// errors.
    #[instrument(skip(self, system), fields(name = %system.name))]
    pub async fn create_system(&self, system: &System) -> Result<System> {
        require(&system.name, "system name")?;
        if system.gateway.is_none() {
            return Err(AirVantageError::InvalidArgument("system gateway is required".to_string()));
        }
        self.post_json(self.url("systems", &QueryParams::new()), system).await
    }

    /// `PUT systems/{uid}`
    ///
    /// # Errors
    /// `InvalidArgument` for an empty uid, otherwise request errors.
    #[instrument(skip(self, system))]
    pub async fn update_system(&self, uid: &str, system: &System) -> Result<System> {
        require(uid, "system uid")?;
        self.put_json(self.url(&format!("systems/{uid}"), &QueryParams::new()), system).await
    }

    /// `DELETE systems/{uid}`
    ///
    /// # Errors
    /// `InvalidArgument` for an empty uid, otherwise request errors.
    #[instrument(skip(self))]
    pub async fn delete_system(&self, uid: &str, options: DeleteOptions) -> Result<()> {
        require(uid, "system uid")?;
        let params = QueryParams::new()
            .with("deleteGateway", options.delete_gateway)
            .with("deleteSubscription", options.delete_subscription);
        self.send(Method::DELETE, self.url(&format!("systems/{uid}"), &params), RequestBody::Empty)
            .await?;
        Ok(())
    }

    /// Latest values reported by a system, keyed by data id
    ///
    /// `data_ids` is an optional comma-separated selection.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty uid, otherwise request errors.
    #[instrument(skip(self))]
    pub async fn get_latest_data(
        &self,
        system_uid: &str,
        data_ids: Option<&str>,
    ) -> Result<HashMap<String, Vec<TsValue>>> {
        require(system_uid, "system uid")?;
        let params = QueryParams::new().with_opt("ids", data_ids.filter(|ids| !ids.is_empty()));
        self.get(self.url(&format!("systems/{system_uid}/data"), &params)).await
    }

    /// Data of every system of a company between `from` and `to`
    ///
    /// # Errors
    /// `InvalidArgument` for an empty company or `from > to`, otherwise
    /// request errors.
    #[instrument(skip(self))]
    pub async fn export_data_from_devices(
        &self,
        company_uid: &str,
        data_ids: Option<&str>,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<DataAggregate> {
        require(company_uid, "company uid")?;
        if from > to {
            return Err(AirVantageError::InvalidArgument(format!("export range is reversed: {from} > {to}")));
        }

        let params = QueryParams::new()
            .with("targetIds", company_uid)
            .with_opt("dataIds", data_ids.filter(|ids| !ids.is_empty()))
            .with("from", from)
            .with("to", to);
        self.get(self.url("systems/data/fleet", &params)).await
    }

    /// Apply a settings template to the given systems
    ///
    /// # Errors
    /// `InvalidArgument` for an empty template or selection, otherwise
    /// request errors.
    #[instrument(skip(self, system_uids), fields(systems = system_uids.len()))]
    pub async fn apply_template_by_uids(&self, template: &str, system_uids: &[String]) -> Result<OperationRef> {
        require(template, "template name")?;
        if system_uids.is_empty() {
            return Err(AirVantageError::InvalidArgument("no system uid given".to_string()));
        }
        let body = ApplySettings {
            systems: SystemSelection { uids: Some(system_uids), labels: None },
            template_name: template,
        };
        self.post_json(self.url("operations/systems/settings", &QueryParams::new()), &body).await
    }

    /// Apply a settings template to every system carrying one of `labels`
    ///
    /// # Errors
    /// `InvalidArgument` for an empty template or label list, otherwise
    /// request errors.
    #[instrument(skip(self))]
    pub async fn apply_template_by_labels(&self, template: &str, labels: &[String]) -> Result<OperationRef> {
        require(template, "template name")?;
        if labels.is_empty() {
            return Err(AirVantageError::InvalidArgument("no label given".to_string()));
        }
        let body = ApplySettings {
            systems: SystemSelection { uids: None, labels: Some(labels) },
            template_name: template,
        };
        self.post_json(self.url("operations/systems/settings", &QueryParams::new()), &body).await
    }

    /// Install or upgrade an application on one system; returns the
    /// operation uid
    ///
    /// # Errors
    /// `InvalidArgument` for empty identifiers, otherwise request errors.
    #[instrument(skip(self))]
    pub async fn install_application(&self, app_uid: &str, system_uid: &str) -> Result<String> {
        require(app_uid, "application uid")?;
        require(system_uid, "system uid")?;
        let uids = [system_uid.to_string()];
        let body = InstallApplication {
            systems: SystemSelection { uids: Some(uids.as_slice()), labels: None },
            application: app_uid,
        };
        let started: OperationRef = self
            .post_json(self.url("operations/systems/applications/install", &QueryParams::new()), &body)
            .await?;
        debug!(operation = %started.operation, "Application install started");
        Ok(started.operation)
    }

    /// Create one READY system per serial of `batch`, bound to application
    /// `app_uid`, and wait for the import to complete
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty batch or application uid
    /// - `PollTimeout` when the import does not finish within a minute
    /// - `PartialFailure` when some systems were not created
    #[instrument(skip(self, batch), fields(systems = batch.len()))]
    pub async fn import_systems(&self, batch: &ImportBatch, app_uid: &str) -> Result<Operation> {
        require(app_uid, "application uid")?;
        let csv = batch.to_csv()?;
        let defaults = ImportSystemsDefaults::ready(app_uid, batch.system_type.clone());
        self.import_systems_csv(csv.into_bytes(), &defaults, DEFAULT_IMPORT_TIMEOUT).await
    }

    /// Upload an import CSV and wait up to `timeout` for every row to succeed
    ///
    /// # Errors
    /// See [`AirVantageClient::import_systems`].
    pub async fn import_systems_csv(
        &self,
        csv: Vec<u8>,
        defaults: &ImportSystemsDefaults,
        timeout: Duration,
    ) -> Result<Operation> {
        if csv.is_empty() {
            return Err(AirVantageError::InvalidArgument("import CSV is empty".to_string()));
        }
        let parameters = serde_json::to_vec(defaults)
            .map_err(|e| AirVantageError::InvalidArgument(format!("Failed to serialize import parameters: {e}")))?;

        let form = Form::new()
            .part("csv", Part::bytes(csv).file_name("file.csv").mime_str("text/csv").map_err(InfraError::from)?)
            .part(
                "parameters",
                Part::bytes(parameters)
                    .file_name("parameters.json")
                    .mime_str("application/json")
                    .map_err(InfraError::from)?,
            );

        let started: OperationRef = self
            .send(Method::POST, self.url("operations/systems/import", &QueryParams::new()), RequestBody::Multipart(form))
            .await?
            .decode()?;
        info!(operation = %started.operation, "Systems import started");

        self.await_operation_success(&started.operation, timeout).await
    }
}
