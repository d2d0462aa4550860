use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use api_gateway::ApiGateway;
use authz_resolver::{AuthZResolverLocalClient, Service};
use authz_resolver_sdk::policies::APPLICATION;
use clap::Parser;
use static_authn_plugin::StaticAuthNPlugin;
use tokio_util::sync::CancellationToken;

mod config;
mod identity;

use config::AppConfig;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Warden API access server
#[derive(Parser, Debug)]
#[command(name = "warden-server", version, about, long_about = None)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Development mode: bearer tokens are accepted over plaintext
    #[arg(long)]
    development: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.development {
        config.api_gateway.auth.development = true;
    }

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    warden_logging::init_logging(&config.logging).context("failed to initialize logging")?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        development = config.api_gateway.auth.development,
        "starting warden-server"
    );

    let authn = Arc::new(StaticAuthNPlugin::from_config(&config.static_authn));
    let authz_service =
        Service::from_config(&config.authz_resolver).context("invalid policy declarations")?;
    let authz = Arc::new(AuthZResolverLocalClient::new(Arc::new(authz_service)));

    let gateway = ApiGateway::new(config.api_gateway, authn, authz)
        .context("invalid gateway configuration")?
        .require_policy(APPLICATION, identity::router())?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("shutdown requested"),
                Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signal"),
            }
            cancel.cancel();
        }
    });

    gateway.serve(cancel).await
}
