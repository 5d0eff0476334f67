//! Service Usage API client
//!
//! Enables project-level APIs before any other resource is provisioned.

use crate::error::Result;
use crate::rest::expect_success;
use serde::Deserialize;

const SERVICE_USAGE_API_BASE: &str = "https://serviceusage.googleapis.com/v1";

/// Service Usage API client
pub struct ServiceUsage {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ServiceUsage {
    /// Create a new client authenticated with a bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: SERVICE_USAGE_API_BASE.to_string(),
        }
    }

    /// Override the API endpoint (for tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Enable a single service on the project.
    pub async fn enable(&self, project_id: &str, service: &str) -> Result<()> {
        let url = format!(
            "{}/projects/{}/services/{}:enable",
            self.base_url, project_id, service
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let response = expect_success("Service Usage", response).await?;

        // The enable call returns a long-running operation; the lab flow
        // does not wait on it, matching the fire-and-forget semantics.
        let operation: EnableOperation = response.json().await?;
        tracing::debug!(service, operation = ?operation.name, done = operation.done, "enable requested");
        Ok(())
    }

    /// Enable every service in the list, in order.
    pub async fn enable_all(&self, project_id: &str, services: &[&str]) -> Result<()> {
        for service in services {
            tracing::info!(service, "enabling service");
            self.enable(project_id, service).await?;
        }
        Ok(())
    }
}

/// Long-running operation returned by `services.enable`.
#[derive(Debug, Deserialize)]
struct EnableOperation {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    done: bool,
}
