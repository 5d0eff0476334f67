//! gcloud CLI wrapper
//!
//! Wraps the gcloud CLI for the operations that have no thin REST
//! equivalent: auth inspection, project metadata and Cloud Function
//! deployment (which drives a whole build/package flow on the provider
//! side).

use crate::error::{GcpError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// gcloud CLI wrapper, scoped to one project.
pub struct Gcloud {
    project_id: String,
}

impl Gcloud {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }

    /// Check that gcloud is installed and has an active account.
    pub async fn check_auth(&self) -> Result<AccountInfo> {
        // Check if gcloud exists
        let which = Command::new("which").arg("gcloud").output().await?;

        if !which.status.success() {
            return Err(GcpError::GcloudNotFound);
        }

        let output = self.run_command(&["auth", "list", "--format=json"]).await?;

        let accounts: Vec<AccountInfo> = serde_json::from_str(&output)?;
        accounts
            .into_iter()
            .find(|a| a.is_active())
            .ok_or_else(|| {
                GcpError::AuthenticationFailed(
                    "no active account. Run `gcloud auth login` first".to_string(),
                )
            })
    }

    /// Run a gcloud command and return stdout.
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("gcloud");
        cmd.args(args);
        cmd.arg("--project").arg(&self.project_id);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(
            "Running: gcloud {} --project {}",
            args.join(" "),
            self.project_id
        );

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GcpError::CommandFailed(stderr.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Numeric project number of the configured project.
    pub async fn project_number(&self) -> Result<String> {
        let output = self
            .run_command(&[
                "projects",
                "describe",
                self.project_id.as_str(),
                "--format=value(projectNumber)",
            ])
            .await?;

        let number = output.trim().to_string();
        if number.is_empty() {
            return Err(GcpError::CommandFailed(format!(
                "empty project number for {}",
                self.project_id
            )));
        }
        Ok(number)
    }

    /// Short-lived access token for the active account. Feeds the REST
    /// clients so the run uses the same ambient credentials as gcloud.
    pub async fn access_token(&self) -> Result<String> {
        let output = self.run_command(&["auth", "print-access-token"]).await?;

        let token = output.trim().to_string();
        if token.is_empty() {
            return Err(GcpError::AuthenticationFailed(
                "gcloud returned an empty access token".to_string(),
            ));
        }
        Ok(token)
    }

    /// Deploy a Cloud Function from a local source directory.
    pub async fn deploy_function(&self, config: &DeployFunctionConfig) -> Result<()> {
        let args = config.to_args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_command(&args).await?;
        Ok(())
    }
}

/// Configuration for `gcloud functions deploy`.
#[derive(Debug, Clone)]
pub struct DeployFunctionConfig {
    pub function_name: String,
    pub runtime: String,
    pub trigger_bucket: String,
    pub entry_point: String,
    pub region: String,
    pub source_dir: PathBuf,
}

impl DeployFunctionConfig {
    fn to_args(&self) -> Vec<String> {
        vec![
            "functions".to_string(),
            "deploy".to_string(),
            self.function_name.clone(),
            "--runtime".to_string(),
            self.runtime.clone(),
            "--trigger-resource".to_string(),
            self.trigger_bucket.clone(),
            "--trigger-event".to_string(),
            "google.storage.object.finalize".to_string(),
            "--entry-point".to_string(),
            self.entry_point.clone(),
            format!("--region={}", self.region),
            "--source".to_string(),
            self.source_dir.display().to_string(),
            "--quiet".to_string(),
        ]
    }
}

/// Account entry from `gcloud auth list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account: String,

    #[serde(default)]
    pub status: String,
}

impl AccountInfo {
    pub fn is_active(&self) -> bool {
        self.status == "ACTIVE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_args() {
        let config = DeployFunctionConfig {
            function_name: "notify".to_string(),
            runtime: "python310".to_string(),
            trigger_bucket: "my-proj-bucket".to_string(),
            entry_point: "main".to_string(),
            region: "us-central1".to_string(),
            source_dir: PathBuf::from("./function_source"),
        };

        let args = config.to_args();
        assert_eq!(args[0], "functions");
        assert_eq!(args[1], "deploy");
        assert_eq!(args[2], "notify");
        assert!(args.contains(&"--trigger-resource".to_string()));
        assert!(args.contains(&"google.storage.object.finalize".to_string()));
        assert!(args.contains(&"--region=us-central1".to_string()));
        assert_eq!(args.last().unwrap(), "--quiet");

        // --trigger-event must directly follow the bucket pair
        let idx = args.iter().position(|a| a == "--trigger-resource").unwrap();
        assert_eq!(args[idx + 1], "my-proj-bucket");
        assert_eq!(args[idx + 2], "--trigger-event");
    }

    #[test]
    fn test_auth_list_parsing() {
        let json = r#"[
            {"account": "student@example.com", "status": "ACTIVE"},
            {"account": "old@example.com", "status": ""}
        ]"#;
        let accounts: Vec<AccountInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(accounts.len(), 2);
        assert!(accounts[0].is_active());
        assert!(!accounts[1].is_active());
    }

    #[test]
    fn test_auth_list_parsing_without_status() {
        let json = r#"[{"account": "student@example.com"}]"#;
        let accounts: Vec<AccountInfo> = serde_json::from_str(json).unwrap();
        assert!(!accounts[0].is_active());
    }
}
