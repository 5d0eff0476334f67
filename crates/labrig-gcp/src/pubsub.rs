//! Pub/Sub API client

use crate::error::Result;
use crate::rest::expect_success;
use serde::{Deserialize, Serialize};

const PUBSUB_API_BASE: &str = "https://pubsub.googleapis.com/v1";

/// Fully qualified topic name.
pub fn topic_path(project_id: &str, topic_name: &str) -> String {
    format!("projects/{project_id}/topics/{topic_name}")
}

/// Pub/Sub API client
pub struct PubSub {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl PubSub {
    /// Create a new client authenticated with a bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: PUBSUB_API_BASE.to_string(),
        }
    }

    /// Override the API endpoint (for tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a topic.
    pub async fn create_topic(&self, project_id: &str, topic_name: &str) -> Result<TopicInfo> {
        let url = format!("{}/{}", self.base_url, topic_path(project_id, topic_name));

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let response = expect_success("Pub/Sub", response).await?;
        let topic: TopicInfo = response.json().await?;
        tracing::debug!(topic = %topic.name, "topic created");
        Ok(topic)
    }
}

/// Topic resource as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicInfo {
    pub name: String,
}
