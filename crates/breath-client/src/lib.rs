//! Blocking HTTP clients for the services around the retraining workflow.
//!
//! - [`HttpTrainingService`] implements [`breath_core::TrainingService`]
//! - [`RegistryClient`] lists trained models
//! - [`PredictionClient`] fetches diagnostic codes and predictions
//!
//! Non-success responses become [`ClientError::Service`] carrying the
//! service's own `error` text.

mod config;
mod error;
mod http;
mod prediction;
mod registry;
mod training;

pub use config::ServiceEndpoints;
pub use error::{ClientError, Result};
pub use prediction::PredictionClient;
pub use registry::RegistryClient;
pub use training::HttpTrainingService;
