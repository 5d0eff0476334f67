//! The `check` command: verify credentials before a run.

use colored::Colorize;
use labrig_gcp::Gcloud;

pub async fn handle(project: Option<String>) -> anyhow::Result<()> {
    let project_id = match project {
        Some(p) => p,
        None => labrig_core::project_id_from_env()?,
    };

    println!("{}", "Checking gcloud setup...".blue().bold());
    println!("  project: {}", project_id.cyan());

    let gcloud = Gcloud::new(&project_id);
    let account = gcloud.check_auth().await?;
    println!("  ✓ active account: {}", account.account);

    let project_number = gcloud.project_number().await?;
    println!("  ✓ project number: {}", project_number);

    println!();
    println!("{}", "✓ Ready to provision. Run `labrig up`.".green().bold());
    Ok(())
}
