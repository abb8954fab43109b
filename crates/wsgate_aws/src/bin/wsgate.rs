use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wsgate_aws::aws::gateway::ApiGatewayManagementClient;
use wsgate_aws::aws::permissions::LambdaPermissionClient;
use wsgate_aws::aws::stack_outputs::CloudFormationOutputs;
use wsgate_aws::lifecycle::WebsocketGatewayManager;
use wsgate_core::manifest::ServiceManifest;

#[derive(Parser)]
#[command(
    name = "wsgate",
    about = "Provision, inspect, and tear down a websocket gateway for a deployed service"
)]
struct Cli {
    /// Path to the service manifest
    #[arg(long, default_value = "wsgate.yml")]
    manifest: PathBuf,

    /// Target stage, overriding the manifest
    #[arg(long, env = "WSGATE_STAGE")]
    stage: Option<String>,

    /// Target region, overriding the manifest
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wire routes, integrations, and permissions, then publish a
    /// stage-bound deployment (run after the service itself deploys)
    Deploy,
    /// Delete the websocket gateway if it exists
    Remove,
    /// Print the websocket endpoint and its routes
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut manifest = ServiceManifest::from_yaml_file(&cli.manifest)
        .with_context(|| format!("failed to load manifest '{}'", cli.manifest.display()))?;
    if let Some(stage) = cli.stage {
        manifest.provider.stage = stage;
    }
    if let Some(region) = cli.region {
        manifest.provider.region = region;
    }
    manifest.validate()?;

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(manifest.provider.region.clone()))
        .load()
        .await;

    let manager = WebsocketGatewayManager::new(
        manifest,
        Arc::new(ApiGatewayManagementClient::new(&sdk_config)),
        Arc::new(LambdaPermissionClient::new(&sdk_config)),
        Arc::new(CloudFormationOutputs::new(&sdk_config)),
    );

    match cli.command {
        Commands::Deploy => {
            manager.deploy().await?;
        }
        Commands::Remove => {
            manager.remove().await?;
        }
        Commands::Info => {
            if let Some(block) = manager.info().await? {
                print!("{block}");
            }
        }
    }

    Ok(())
}
