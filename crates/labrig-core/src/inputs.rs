//! Run inputs and naming rules
//!
//! Everything the pipeline derives from the four console inputs and the
//! ambient project id lives here, so the derivations stay testable.

use crate::error::{Result, RigError};
use serde::{Deserialize, Serialize};

/// Environment variable holding the target project id.
pub const PROJECT_ID_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Project APIs that must be enabled before anything else is provisioned.
pub const REQUIRED_SERVICES: &[&str] = &[
    "artifactregistry.googleapis.com",
    "cloudfunctions.googleapis.com",
    "cloudbuild.googleapis.com",
    "eventarc.googleapis.com",
    "run.googleapis.com",
    "logging.googleapis.com",
    "pubsub.googleapis.com",
];

/// Resolved inputs for one provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabInputs {
    /// Lab operator username. Recorded in the run summary only.
    pub operator: String,

    /// Compute zone, e.g. `us-central1-a`.
    pub zone: String,

    /// Pub/Sub topic to create and wire into the handler.
    pub topic_name: String,

    /// Name of the Cloud Function to deploy.
    pub function_name: String,

    /// Target project id (from `GOOGLE_CLOUD_PROJECT`).
    pub project_id: String,
}

impl LabInputs {
    /// Validate the inputs and return the resolved set.
    pub fn new(
        operator: impl Into<String>,
        zone: impl Into<String>,
        topic_name: impl Into<String>,
        function_name: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Result<Self> {
        let inputs = Self {
            operator: operator.into(),
            zone: zone.into(),
            topic_name: topic_name.into(),
            function_name: function_name.into(),
            project_id: project_id.into(),
        };
        inputs.validate()?;
        Ok(inputs)
    }

    fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("operator", &self.operator),
            ("zone", &self.zone),
            ("topic name", &self.topic_name),
            ("function name", &self.function_name),
            ("project id", &self.project_id),
        ] {
            if value.trim().is_empty() {
                return Err(RigError::InvalidInput(format!("{label} must not be empty")));
            }
        }
        // Fails early instead of deriving a garbage region later.
        region_from_zone(&self.zone)?;
        Ok(())
    }

    /// Region the zone belongs to.
    pub fn region(&self) -> String {
        // validate() already checked the zone shape.
        region_from_zone(&self.zone).unwrap_or_else(|_| self.zone.clone())
    }

    /// Bucket provisioned for this project.
    pub fn bucket_name(&self) -> String {
        bucket_name(&self.project_id)
    }
}

/// Derive the region from a zone by dropping the final segment
/// (`us-central1-a` → `us-central1`).
pub fn region_from_zone(zone: &str) -> Result<String> {
    match zone.rsplit_once('-') {
        Some((region, suffix)) if !region.is_empty() && !suffix.is_empty() => {
            Ok(region.to_string())
        }
        _ => Err(RigError::InvalidZone(zone.to_string())),
    }
}

/// The single bucket provisioned per project.
pub fn bucket_name(project_id: &str) -> String {
    format!("{project_id}-bucket")
}

/// Service agent that publishes storage notifications to Pub/Sub.
pub fn pubsub_service_agent(project_number: &str) -> String {
    format!("service-{project_number}@gcp-sa-pubsub.iam.gserviceaccount.com")
}

/// IAM member string for a service account.
pub fn service_account_member(email: &str) -> String {
    format!("serviceAccount:{email}")
}

/// Read the target project id from `GOOGLE_CLOUD_PROJECT`.
pub fn project_id_from_env() -> Result<String> {
    match std::env::var(PROJECT_ID_ENV) {
        Ok(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(RigError::ProjectIdNotSet),
    }
}
