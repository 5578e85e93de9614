//! Dashboard prediction adapter.

use breath_model::{PredictionRequest, PredictionResponse};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::{ServiceEndpoints, endpoint};
use crate::error::Result;
use crate::http::{build_client, success_json};

#[derive(Deserialize)]
struct CodesBody {
    codes: Vec<String>,
}

/// Diagnostic codes and survival/readmission predictions.
///
/// Predictions for a chosen model go to the training service, which scores
/// stored models by id. Without a model id the dashboard scores its latest
/// model.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: Client,
    dashboard_url: String,
    training_url: String,
}

impl PredictionClient {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self> {
        Ok(Self {
            client: build_client(endpoints.timeout())?,
            dashboard_url: endpoints.dashboard_url.clone(),
            training_url: endpoints.training_url.clone(),
        })
    }

    /// Codes the dashboard offers for selection.
    pub fn diagnostic_codes(&self) -> Result<Vec<String>> {
        let url = endpoint(&self.dashboard_url, "/diagnostic-codes");
        let body: CodesBody = success_json(self.client.get(&url).send()?)?;
        tracing::debug!(count = body.codes.len(), "diagnostic codes fetched");
        Ok(body.codes)
    }

    /// Checks the form rules, then requests curves for one patient.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        request.validate()?;
        let base_url = match request.model_id {
            Some(_) => &self.training_url,
            None => &self.dashboard_url,
        };
        let url = endpoint(base_url, "/predict");
        tracing::debug!(
            url = %url,
            model_id = ?request.model_id,
            codes = request.diagnostic_codes.len(),
            "requesting prediction"
        );
        success_json(self.client.post(&url).json(request).send()?)
    }
}
