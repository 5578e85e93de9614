//! Training service adapter.

use breath_core::{TrainingAck, TrainingError, TrainingRequest, TrainingService};
use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use serde::Serialize;

use crate::config::{ServiceEndpoints, endpoint};
use crate::error::{ClientError, Result};
use crate::http::{build_client, ensure_success, message_field, success_text};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrainBody<'a> {
    model_name: &'a str,
}

/// Uploads the file (`POST /fileUpload`) and then starts training
/// (`POST /train`).
#[derive(Debug, Clone)]
pub struct HttpTrainingService {
    client: Client,
    base_url: String,
}

impl HttpTrainingService {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self> {
        Ok(Self {
            client: build_client(endpoints.timeout())?,
            base_url: endpoints.training_url.clone(),
        })
    }

    /// Sends the upload as multipart form data.
    ///
    /// A successful upload answers with the processed patient archive. Only
    /// its size is returned; the content is never decoded or logged.
    pub fn upload(&self, request: &TrainingRequest) -> Result<usize> {
        let file = &request.file;
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime())?;
        let form = Form::new()
            .part("file", part)
            .text(
                "diagnostic_interest",
                request.metadata.diagnostic_interest().to_string(),
            )
            .text("model_name", request.metadata.model_name().to_string());

        let url = endpoint(&self.base_url, "/fileUpload");
        tracing::debug!(
            url = %url,
            file = %file.name(),
            bytes = file.len(),
            "uploading training file"
        );
        let response = ensure_success(self.client.post(&url).multipart(form).send()?)?;
        Ok(response.bytes()?.len())
    }

    /// Starts fitting the model for an uploaded file.
    pub fn train(&self, model_name: &str) -> Result<String> {
        let url = endpoint(&self.base_url, "/train");
        tracing::debug!(url = %url, model_name, "requesting training");
        let response = self
            .client
            .post(&url)
            .json(&TrainBody { model_name })
            .send()?;
        success_text(response)
    }

    fn run(&self, request: &TrainingRequest) -> Result<TrainingAck> {
        let archive_bytes = self.upload(request)?;
        tracing::debug!(archive_bytes, "upload accepted");
        let body = self.train(request.metadata.model_name())?;
        let message = message_field(&body, &["message", "result"])
            .unwrap_or_else(|| body.trim().to_string());
        Ok(TrainingAck { message })
    }
}

impl TrainingService for HttpTrainingService {
    fn submit(
        &self,
        request: &TrainingRequest,
    ) -> std::result::Result<TrainingAck, TrainingError> {
        self.run(request).map_err(|err| {
            tracing::warn!(
                error = %err,
                retryable = err.is_retryable(),
                "training request failed"
            );
            TrainingError::new(training_message(&err))
        })
    }
}

fn training_message(err: &ClientError) -> String {
    match err {
        ClientError::Service { message, .. } if !message.is_empty() => message.clone(),
        other => other.user_message(),
    }
}
