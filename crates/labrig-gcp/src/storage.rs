//! Cloud Storage JSON API client
//!
//! Bucket creation plus the simple (single-request) media upload used for
//! the end-of-run verification object.

use crate::error::Result;
use crate::rest::expect_success;
use serde::{Deserialize, Serialize};
use std::path::Path;

const STORAGE_API_BASE: &str = "https://storage.googleapis.com/storage/v1";
const STORAGE_UPLOAD_API_BASE: &str = "https://storage.googleapis.com/upload/storage/v1";

/// Cloud Storage API client
pub struct StorageClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    upload_base_url: String,
}

impl StorageClient {
    /// Create a new client authenticated with a bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: STORAGE_API_BASE.to_string(),
            upload_base_url: STORAGE_UPLOAD_API_BASE.to_string(),
        }
    }

    /// Override both API endpoints (for tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.upload_base_url = base_url.clone();
        self.base_url = base_url;
        self
    }

    /// Create a bucket in the given location.
    pub async fn create_bucket(
        &self,
        project_id: &str,
        bucket_name: &str,
        location: &str,
    ) -> Result<BucketInfo> {
        let url = format!("{}/b", self.base_url);

        let request = CreateBucketRequest {
            name: bucket_name.to_string(),
            location: location.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .query(&[("project", project_id)])
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let response = expect_success("Cloud Storage", response).await?;
        let bucket: BucketInfo = response.json().await?;
        tracing::debug!(bucket = %bucket.name, location, "bucket created");
        Ok(bucket)
    }

    /// Upload an object in a single request.
    pub async fn upload_object(
        &self,
        bucket: &str,
        object_name: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<ObjectInfo> {
        let url = format!("{}/b/{}/o", self.upload_base_url, bucket);

        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", object_name)])
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let response = expect_success("Cloud Storage", response).await?;
        let object: ObjectInfo = response.json().await?;
        Ok(object)
    }

    /// Upload a local file as an object.
    pub async fn upload_file(
        &self,
        bucket: &str,
        object_name: &str,
        file_path: &Path,
    ) -> Result<ObjectInfo> {
        let body = tokio::fs::read(file_path).await?;
        self.upload_object(bucket, object_name, "application/octet-stream", body)
            .await
    }
}

#[derive(Debug, Serialize)]
struct CreateBucketRequest {
    name: String,
    location: String,
}

/// Bucket resource as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketInfo {
    pub name: String,

    #[serde(default)]
    pub location: Option<String>,
}

/// Object resource as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub name: String,

    #[serde(default)]
    pub bucket: Option<String>,

    #[serde(default)]
    pub size: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_bucket() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/b"))
            .and(query_param("project", "my-proj"))
            .and(body_json(serde_json::json!({
                "name": "my-proj-bucket",
                "location": "us-central1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "my-proj-bucket",
                "location": "US-CENTRAL1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = StorageClient::new("tok").with_base_url(server.uri());
        let bucket = client
            .create_bucket("my-proj", "my-proj-bucket", "us-central1")
            .await
            .unwrap();

        assert_eq!(bucket.name, "my-proj-bucket");
        assert_eq!(bucket.location.as_deref(), Some("US-CENTRAL1"));
    }

    #[tokio::test]
    async fn test_create_bucket_conflict() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": {
                    "code": 409,
                    "message": "Your previous request to create the named bucket succeeded and you already own it.",
                    "status": "ALREADY_EXISTS"
                }
            })))
            .mount(&server)
            .await;

        let client = StorageClient::new("tok").with_base_url(server.uri());
        let err = client
            .create_bucket("my-proj", "my-proj-bucket", "us-central1")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("ALREADY_EXISTS"));
    }

    #[tokio::test]
    async fn test_upload_object() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/b/my-proj-bucket/o"))
            .and(query_param("uploadType", "media"))
            .and(query_param("name", "test-image.jpg"))
            .and(header("content-type", "application/octet-stream"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "test-image.jpg",
                "bucket": "my-proj-bucket",
                "size": "3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = StorageClient::new("tok").with_base_url(server.uri());
        let object = client
            .upload_object(
                "my-proj-bucket",
                "test-image.jpg",
                "application/octet-stream",
                b"jpg".to_vec(),
            )
            .await
            .unwrap();

        assert_eq!(object.name, "test-image.jpg");
        assert_eq!(object.size.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_upload_file_reads_local_content() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("test-image.jpg");
        std::fs::write(&file_path, b"fake image bytes").unwrap();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/b/bkt/o"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "test-image.jpg"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = StorageClient::new("tok").with_base_url(server.uri());
        let object = client
            .upload_file("bkt", "test-image.jpg", &file_path)
            .await
            .unwrap();

        assert_eq!(object.name, "test-image.jpg");
    }
}
