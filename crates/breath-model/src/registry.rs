//! Trained-model records from the model registry.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One trained model as reported by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(rename = "modelid")]
    pub model_id: i64,
    #[serde(default)]
    pub model_name: Option<String>,
    /// Concordance index on the held-out split.
    #[serde(default, deserialize_with = "number_or_string")]
    pub c_index: Option<f64>,
    #[serde(rename = "timestamp")]
    pub trained_at: DateTime<Utc>,
    #[serde(rename = "expire_date", default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ModelMetadata {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Postgres numerics arrive as JSON strings; accept both forms.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Whether a model is the one currently serving predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    InUse,
    NotInUse,
    Expired,
}

impl ModelStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InUse => "Model In Use",
            Self::NotInUse => "Model Not In Use",
            Self::Expired => "Expired",
        }
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Registry records ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct ModelHistory {
    models: Vec<ModelMetadata>,
}

impl ModelHistory {
    pub fn new(mut models: Vec<ModelMetadata>) -> Self {
        models.sort_by(|a, b| {
            b.trained_at
                .cmp(&a.trained_at)
                .then_with(|| b.model_id.cmp(&a.model_id))
        });
        Self { models }
    }

    pub fn models(&self) -> &[ModelMetadata] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// The most recently trained model.
    pub fn in_use(&self) -> Option<&ModelMetadata> {
        self.models.first()
    }

    /// Every model sharing the latest training timestamp is in use.
    pub fn status(&self, model: &ModelMetadata, now: DateTime<Utc>) -> ModelStatus {
        match self.in_use() {
            Some(latest) if latest.trained_at == model.trained_at => ModelStatus::InUse,
            _ if model.is_expired(now) => ModelStatus::Expired,
            _ => ModelStatus::NotInUse,
        }
    }
}
