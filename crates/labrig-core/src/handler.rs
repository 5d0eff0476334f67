//! Cloud Function handler source
//!
//! Renders the Python handler deployed for the lab pipeline. The handler
//! reacts to a storage object-finalize event and publishes a message to
//! the run's Pub/Sub topic; the topic name is baked in at render time.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tracing::debug;

/// File name the deployment CLI expects inside the source directory.
pub const HANDLER_FILE_NAME: &str = "main.py";

/// Entry point name passed to the deployment CLI.
pub const HANDLER_ENTRY_POINT: &str = "main";

/// Runtime the handler targets.
pub const HANDLER_RUNTIME: &str = "python310";

const HANDLER_TEMPLATE: &str = r#"from google.cloud import pubsub_v1
from google.cloud import storage
import os

def main(event, context):
    bucket_name = event['bucket']
    file_name = event['name']
    print(f"Processing file {file_name} in bucket {bucket_name}")

    # Publish a message to the Pub/Sub topic
    publisher = pubsub_v1.PublisherClient()
    topic_path = publisher.topic_path(os.getenv('GOOGLE_CLOUD_PROJECT'), '{{ topic_name }}')
    publisher.publish(topic_path, data=f"Processed {file_name}".encode())
    print(f"Message published for file {file_name}")
"#;

/// Render the handler body with the topic name substituted.
pub fn render_handler(topic_name: &str) -> Result<String> {
    let mut context = Context::new();
    context.insert("topic_name", topic_name);
    let rendered = Tera::one_off(HANDLER_TEMPLATE, &context, false)?;
    Ok(rendered)
}

/// Write the rendered handler into `source_dir`, creating the directory
/// if needed. Returns the path of the written file.
pub fn write_handler(source_dir: &Path, topic_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(source_dir)?;
    let path = source_dir.join(HANDLER_FILE_NAME);
    let body = render_handler(topic_name)?;
    std::fs::write(&path, body)?;
    debug!(path = %path.display(), "wrote handler source");
    Ok(path)
}
