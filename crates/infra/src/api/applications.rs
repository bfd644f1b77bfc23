//! Applications endpoints

use airvantage_core::QueryParams;
use airvantage_domain::{AirVantageError, Application, OperationRef, Page, Result};
use reqwest::Method;
use tracing::{info, instrument};

use super::client::{require, AirVantageClient, RequestBody};

impl AirVantageClient {
    /// UID of the single PUBLISHED application named `name` at revision
    /// `revision`
    ///
    /// # Errors
    /// - `NotFound` when nothing matches
    /// - `InvalidState` when several applications match or the match is not
    ///   published
    #[instrument(skip(self))]
    pub async fn find_app_uid(&self, name: &str, revision: &str) -> Result<String> {
        require(name, "application name")?;
        let params = QueryParams::new()
            .with("name", name)
            .with("revision", revision)
            .with("fields", "uid,state")
            .with("size", 2);
        let page: Page<Application> = self.get(self.url("applications", &params)).await?;

        let mut apps = page.into_items();
        let app = match apps.len() {
            0 => return Err(AirVantageError::NotFound(format!("no application matching '{name}'"))),
            1 => apps.remove(0),
            _ => {
                return Err(AirVantageError::InvalidState(format!(
                    "several applications matching '{name}'"
                )))
            }
        };

        if !app.is_published() {
            return Err(AirVantageError::InvalidState(format!("application '{name}' is not PUBLISHED")));
        }

        app.uid
            .ok_or_else(|| AirVantageError::InvalidState(format!("application '{name}' has no uid")))
    }

    /// First application with the given type and revision
    ///
    /// # Errors
    /// `NotFound` when nothing matches, otherwise request errors.
    #[instrument(skip(self))]
    pub async fn find_app_by_type_rev(&self, app_type: &str, revision: &str) -> Result<Application> {
        require(app_type, "application type")?;
        let params = QueryParams::new().with("type", app_type).with("revision", revision);
        let page: Page<Application> = self.get(self.url("applications", &params)).await?;

        page.into_items().into_iter().next().ok_or_else(|| {
            AirVantageError::NotFound(format!(
                "no application with matching type '{app_type}' & revision '{revision}'"
            ))
        })
    }

    /// Release an application package; returns the operation uid
    ///
    /// # Errors
    /// `InvalidArgument` for an empty package, otherwise request errors.
    #[instrument(skip(self, package), fields(bytes = package.len()))]
    pub async fn release_application(&self, package: Vec<u8>) -> Result<String> {
        if package.is_empty() {
            return Err(AirVantageError::InvalidArgument("application package is empty".to_string()));
        }

        let url = self.url("operations/applications/release", &QueryParams::new());
        let body = RequestBody::Raw { content_type: "application/zip", data: package };
        let started: OperationRef = self.send(Method::POST, url, body).await?.decode()?;

        info!(operation = %started.operation, "Application release started");
        Ok(started.operation)
    }
}
