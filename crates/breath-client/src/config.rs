//! Service locations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URLs of the external services plus the request timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    /// Upload and training service.
    pub training_url: String,
    /// Model registry (`GET /model`).
    pub registry_url: String,
    /// Dashboard service (diagnostic codes and predictions).
    pub dashboard_url: String,
    /// Per-request timeout in seconds. Training can take minutes.
    pub timeout_secs: u64,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            training_url: "http://localhost:5002".to_string(),
            registry_url: "http://localhost:5000".to_string(),
            dashboard_url: "http://localhost:5001".to_string(),
            timeout_secs: 600,
        }
    }
}

impl ServiceEndpoints {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoints with every service at one base URL.
    pub fn single(base_url: &str) -> Self {
        Self {
            training_url: base_url.to_string(),
            registry_url: base_url.to_string(),
            dashboard_url: base_url.to_string(),
            ..Self::default()
        }
    }
}

/// Joins a base URL and an absolute path without doubling the slash.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_toml_like_json() {
        let endpoints: ServiceEndpoints =
            serde_json::from_str(r#"{"registry_url": "http://models.internal"}"#).unwrap();
        assert_eq!(endpoints.registry_url, "http://models.internal");
        assert_eq!(endpoints.training_url, "http://localhost:5002");
        assert_eq!(endpoints.timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_endpoint_join() {
        assert_eq!(endpoint("http://h:1/", "/train"), "http://h:1/train");
        assert_eq!(endpoint("http://h:1", "model"), "http://h:1/model");
    }
}
