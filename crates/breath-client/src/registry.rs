//! Model registry adapter.

use breath_core::UserId;
use breath_model::{ModelHistory, ModelMetadata};
use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::config::{ServiceEndpoints, endpoint};
use crate::error::Result;
use crate::http::{build_client, success_json};

/// Lists the models a user has trained.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self> {
        Ok(Self {
            client: build_client(endpoints.timeout())?,
            base_url: endpoints.registry_url.clone(),
        })
    }

    /// `GET /model` for the user. A 404 means no models have been trained.
    pub fn list_models(&self, user: &UserId) -> Result<Vec<ModelMetadata>> {
        let url = endpoint(&self.base_url, "/model");
        tracing::debug!(url = %url, "listing models");
        let response = self
            .client
            .get(&url)
            .header("Email", user.as_str())
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("registry has no models for this user");
            return Ok(Vec::new());
        }
        let models: Vec<ModelMetadata> = success_json(response)?;
        tracing::debug!(count = models.len(), "models listed");
        Ok(models)
    }

    /// The user's models ordered newest first.
    pub fn history(&self, user: &UserId) -> Result<ModelHistory> {
        Ok(ModelHistory::new(self.list_models(user)?))
    }
}
