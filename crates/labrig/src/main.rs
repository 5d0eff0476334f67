mod commands;
mod prompt;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labrig")]
#[command(
    about = "Provision a storage-triggered GCP lab pipeline in one run",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the whole pipeline: APIs, IAM, bucket, topic, function
    Up {
        /// Lab operator username (prompted if omitted)
        #[arg(long, env = "LABRIG_OPERATOR")]
        operator: Option<String>,

        /// Compute zone, e.g. us-central1-a (prompted if omitted)
        #[arg(short, long, env = "LABRIG_ZONE")]
        zone: Option<String>,

        /// Pub/Sub topic name (prompted if omitted)
        #[arg(short, long, env = "LABRIG_TOPIC")]
        topic: Option<String>,

        /// Cloud Function name (prompted if omitted)
        #[arg(short, long, env = "LABRIG_FUNCTION")]
        function: Option<String>,

        /// Target project id (defaults to GOOGLE_CLOUD_PROJECT)
        #[arg(short, long)]
        project: Option<String>,

        /// Directory where the handler source is written
        #[arg(long, default_value = "./function_source")]
        source_dir: PathBuf,

        /// Local file uploaded to the bucket to exercise the pipeline.
        /// The verification upload is skipped when omitted.
        #[arg(long)]
        test_file: Option<PathBuf>,
    },
    /// Check gcloud installation, authentication and project id
    Check {
        /// Target project id (defaults to GOOGLE_CLOUD_PROJECT)
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    // Version needs neither credentials nor a project
    if matches!(cli.command, Commands::Version) {
        println!("labrig {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match cli.command {
        Commands::Up {
            operator,
            zone,
            topic,
            function,
            project,
            source_dir,
            test_file,
        } => {
            commands::up::handle(commands::up::UpArgs {
                operator,
                zone,
                topic,
                function,
                project,
                source_dir,
                test_file,
            })
            .await?;
        }
        Commands::Check { project } => {
            commands::check::handle(project).await?;
        }
        Commands::Version => {
            unreachable!("Version is handled above");
        }
    }

    Ok(())
}
