//! Cloud Resource Manager IAM client
//!
//! Grants a role on the project via the getIamPolicy/setIamPolicy pair.
//! The read-modify-write is not guarded by an etag; a concurrent policy
//! edit between the two calls can be lost. The lab flow accepts that.

use crate::error::Result;
use crate::rest::expect_success;
use serde::{Deserialize, Serialize};

const RESOURCE_MANAGER_API_BASE: &str = "https://cloudresourcemanager.googleapis.com/v1";

/// Cloud Resource Manager API client
pub struct ResourceManager {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ResourceManager {
    /// Create a new client authenticated with a bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: RESOURCE_MANAGER_API_BASE.to_string(),
        }
    }

    /// Override the API endpoint (for tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the current project access policy.
    pub async fn get_iam_policy(&self, project_id: &str) -> Result<IamPolicy> {
        let url = format!("{}/projects/{}:getIamPolicy", self.base_url, project_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let response = expect_success("Resource Manager", response).await?;
        let policy: IamPolicy = response.json().await?;
        Ok(policy)
    }

    /// Write back the project access policy.
    pub async fn set_iam_policy(&self, project_id: &str, policy: &IamPolicy) -> Result<IamPolicy> {
        let url = format!("{}/projects/{}:setIamPolicy", self.base_url, project_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&SetIamPolicyRequest { policy })
            .send()
            .await?;

        let response = expect_success("Resource Manager", response).await?;
        let policy: IamPolicy = response.json().await?;
        Ok(policy)
    }

    /// Append one role binding and write the policy back.
    pub async fn add_iam_policy_binding(
        &self,
        project_id: &str,
        member: &str,
        role: &str,
    ) -> Result<IamPolicy> {
        let mut policy = self.get_iam_policy(project_id).await?;
        policy.append_binding(member, role);
        tracing::info!(member, role, "adding IAM policy binding");
        self.set_iam_policy(project_id, &policy).await
    }
}

#[derive(Debug, Serialize)]
struct SetIamPolicyRequest<'a> {
    policy: &'a IamPolicy,
}

/// Project access policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IamPolicy {
    #[serde(default)]
    pub bindings: Vec<IamBinding>,
}

impl IamPolicy {
    /// Append a fresh binding entry for `member` -> `role`.
    pub fn append_binding(&mut self, member: &str, role: &str) {
        self.bindings.push(IamBinding {
            role: role.to_string(),
            members: vec![member.to_string()],
        });
    }
}

/// One role-to-members binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IamBinding {
    pub role: String,

    #[serde(default)]
    pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_append_binding() {
        let mut policy = IamPolicy::default();
        policy.append_binding("serviceAccount:svc@example.com", "roles/pubsub.publisher");

        assert_eq!(policy.bindings.len(), 1);
        assert_eq!(policy.bindings[0].role, "roles/pubsub.publisher");
        assert_eq!(
            policy.bindings[0].members,
            vec!["serviceAccount:svc@example.com"]
        );
    }

    #[test]
    fn test_append_binding_keeps_existing_entries() {
        let mut policy = IamPolicy {
            bindings: vec![IamBinding {
                role: "roles/owner".to_string(),
                members: vec!["user:admin@example.com".to_string()],
            }],
        };
        policy.append_binding("serviceAccount:svc@example.com", "roles/pubsub.publisher");

        assert_eq!(policy.bindings.len(), 2);
        assert_eq!(policy.bindings[0].role, "roles/owner");
    }

    #[test]
    fn test_policy_deserializes_without_bindings() {
        let policy: IamPolicy = serde_json::from_str("{}").unwrap();
        assert!(policy.bindings.is_empty());
    }

    #[tokio::test]
    async fn test_add_binding_round_trip() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/projects/my-proj:getIamPolicy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bindings": [
                    {"role": "roles/owner", "members": ["user:admin@example.com"]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        // The written policy must contain both the pre-existing binding
        // and the appended one.
        Mock::given(method("POST"))
            .and(path("/projects/my-proj:setIamPolicy"))
            .and(body_partial_json(serde_json::json!({
                "policy": {
                    "bindings": [
                        {"role": "roles/owner", "members": ["user:admin@example.com"]},
                        {"role": "roles/pubsub.publisher", "members": ["serviceAccount:svc@x.com"]}
                    ]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bindings": [
                    {"role": "roles/owner", "members": ["user:admin@example.com"]},
                    {"role": "roles/pubsub.publisher", "members": ["serviceAccount:svc@x.com"]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ResourceManager::new("tok").with_base_url(server.uri());
        let policy = client
            .add_iam_policy_binding("my-proj", "serviceAccount:svc@x.com", "roles/pubsub.publisher")
            .await
            .unwrap();

        assert_eq!(policy.bindings.len(), 2);
    }
}
