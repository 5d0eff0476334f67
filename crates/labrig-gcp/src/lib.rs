//! Labrig Google Cloud plumbing
//!
//! Two kinds of client live here:
//!
//! - a `gcloud` CLI wrapper for auth inspection, project metadata and
//!   Cloud Function deployment,
//! - thin bearer-token REST clients for the Service Usage, Resource
//!   Manager (IAM), Cloud Storage and Pub/Sub APIs.
//!
//! The REST clients take the access token minted by the `gcloud` wrapper,
//! so every call in a run uses the same ambient credentials.

pub mod error;
pub mod gcloud;
pub mod pubsub;
pub mod resourcemanager;
mod rest;
pub mod serviceusage;
pub mod storage;

// Re-exports
pub use error::{GcpError, Result};
pub use gcloud::{AccountInfo, DeployFunctionConfig, Gcloud};
pub use pubsub::{PubSub, TopicInfo, topic_path};
pub use resourcemanager::{IamBinding, IamPolicy, ResourceManager};
pub use serviceusage::ServiceUsage;
pub use storage::{BucketInfo, ObjectInfo, StorageClient};
