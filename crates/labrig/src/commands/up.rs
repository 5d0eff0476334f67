//! The `up` command: provision the whole lab pipeline in order.
//!
//! Strictly sequential and fail-fast. A step failure aborts the run and
//! leaves everything created so far in place; there is no rollback and
//! no retry.

use crate::prompt;
use anyhow::Context;
use colored::Colorize;
use labrig_core::{
    HANDLER_ENTRY_POINT, HANDLER_RUNTIME, LabInputs, REQUIRED_SERVICES, pubsub_service_agent,
    service_account_member, write_handler,
};
use labrig_gcp::{
    DeployFunctionConfig, Gcloud, PubSub, ResourceManager, ServiceUsage, StorageClient, topic_path,
};
use std::path::PathBuf;

/// Object name for the end-of-run verification upload.
const TEST_OBJECT_NAME: &str = "test-image.jpg";

/// Role granted to the Pub/Sub service agent.
const PUBLISHER_ROLE: &str = "roles/pubsub.publisher";

pub struct UpArgs {
    pub operator: Option<String>,
    pub zone: Option<String>,
    pub topic: Option<String>,
    pub function: Option<String>,
    pub project: Option<String>,
    pub source_dir: PathBuf,
    pub test_file: Option<PathBuf>,
}

pub async fn handle(args: UpArgs) -> anyhow::Result<()> {
    // Resolve inputs: flags/env first, console prompts for the rest
    let project_id = match args.project {
        Some(p) => p,
        None => labrig_core::project_id_from_env()?,
    };
    let operator = prompt::resolve(args.operator, "Enter USERNAME2")?;
    let zone = prompt::resolve(args.zone, "Enter ZONE (e.g., us-central1-a)")?;
    let topic = prompt::resolve(args.topic, "Enter TOPIC_NAME")?;
    let function = prompt::resolve(args.function, "Enter FUNCTION_NAME")?;

    let inputs = LabInputs::new(operator, zone, topic, function, project_id)?;
    let region = inputs.region();
    let bucket_name = inputs.bucket_name();
    tracing::debug!(?inputs, "resolved run inputs");

    println!();
    println!(
        "{}",
        format!("Provisioning lab pipeline in '{}'...", inputs.project_id)
            .blue()
            .bold()
    );
    println!("  region: {}", region.cyan());
    println!("  bucket: {}", bucket_name.cyan());
    println!("  topic: {}", inputs.topic_name.cyan());
    println!("  function: {}", inputs.function_name.cyan());

    // gcloud auth + access token for the REST clients
    println!();
    println!("{}", "Checking gcloud authentication...".blue());
    let gcloud = Gcloud::new(&inputs.project_id);
    let account = gcloud
        .check_auth()
        .await
        .context("checking gcloud authentication")?;
    println!("  ✓ active account: {}", account.account);

    let token = gcloud
        .access_token()
        .await
        .context("fetching access token")?;

    // Enable required services
    println!();
    println!(
        "{}",
        format!("Enabling services ({}):", REQUIRED_SERVICES.len()).bold()
    );
    let service_usage = ServiceUsage::new(&token);
    for service in REQUIRED_SERVICES {
        print!("  {} {} ... ", "▶".green(), service);
        service_usage
            .enable(&inputs.project_id, service)
            .await
            .with_context(|| format!("enabling service {service}"))?;
        println!("✓");
    }

    // Grant the Pub/Sub service agent publish rights on the project
    println!();
    println!("{}", "Adding IAM policy binding...".blue());
    let project_number = gcloud
        .project_number()
        .await
        .context("looking up project number")?;
    let member = service_account_member(&pubsub_service_agent(&project_number));
    let resource_manager = ResourceManager::new(&token);
    resource_manager
        .add_iam_policy_binding(&inputs.project_id, &member, PUBLISHER_ROLE)
        .await
        .context("adding IAM policy binding")?;
    println!("  ✓ {} -> {}", member, PUBLISHER_ROLE);

    // Create the bucket
    println!();
    println!("{}", "Creating storage bucket...".blue());
    let storage = StorageClient::new(&token);
    let bucket = storage
        .create_bucket(&inputs.project_id, &bucket_name, &region)
        .await
        .context("creating storage bucket")?;
    println!("  ✓ bucket {} created in {}", bucket.name.cyan(), region);

    // Create the topic
    println!();
    println!("{}", "Creating Pub/Sub topic...".blue());
    let pubsub = PubSub::new(&token);
    let created_topic = pubsub
        .create_topic(&inputs.project_id, &inputs.topic_name)
        .await
        .context("creating Pub/Sub topic")?;
    println!("  ✓ topic {} created", created_topic.name.cyan());

    // Materialize the handler source
    println!();
    println!("{}", "Writing function source...".blue());
    let handler_path = write_handler(&args.source_dir, &inputs.topic_name)
        .context("writing handler source")?;
    println!("  ✓ {}", handler_path.display());

    // Deploy the function (gcloud drives the build and packaging)
    println!();
    println!("{}", "Deploying Cloud Function...".blue());
    println!("  this can take a few minutes");
    gcloud
        .deploy_function(&DeployFunctionConfig {
            function_name: inputs.function_name.clone(),
            runtime: HANDLER_RUNTIME.to_string(),
            trigger_bucket: bucket_name.clone(),
            entry_point: HANDLER_ENTRY_POINT.to_string(),
            region: region.clone(),
            source_dir: args.source_dir.clone(),
        })
        .await
        .context("deploying Cloud Function")?;
    println!("  ✓ function {} deployed", inputs.function_name.cyan());

    // Exercise the pipeline end to end
    println!();
    match args.test_file {
        Some(ref path) => {
            println!("{}", "Uploading test file to the bucket...".blue());
            storage
                .upload_file(&bucket_name, TEST_OBJECT_NAME, path)
                .await
                .context("uploading test file")?;
            println!("  ✓ {} uploaded to {}", TEST_OBJECT_NAME, bucket_name);
        }
        None => {
            println!(
                "{}",
                "No --test-file given; skipping the verification upload.".yellow()
            );
        }
    }

    println!();
    println!(
        "{}",
        format!("✓ Lab pipeline for '{}' is ready!", inputs.project_id)
            .green()
            .bold()
    );
    println!("  operator: {}", inputs.operator);
    println!(
        "  events: {} -> {} -> {}",
        bucket_name,
        inputs.function_name,
        topic_path(&inputs.project_id, &inputs.topic_name)
    );

    Ok(())
}
