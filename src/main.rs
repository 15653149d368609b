use anyhow::Context;
use clap::Parser;

use domainscout::config::AppConfig;
use domainscout::server::{self, ServerAppState};

/// DomainScout - AI-assisted domain name discovery and market research
#[derive(Parser, Debug)]
#[command(name = "domainscout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long, env = "DOMAINSCOUT_PORT", default_value = "3420")]
    port: u16,

    /// Address to bind the server to
    #[arg(long, env = "DOMAINSCOUT_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Allowed CORS origins (repeatable). Defaults to permissive.
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::init();

    let config = AppConfig::from_env().context("loading provider configuration")?;
    let state = ServerAppState::from_config(config).context("constructing provider adapters")?;

    let cors_origins = if cli.cors_origins.is_empty() {
        None
    } else {
        Some(cli.cors_origins)
    };

    // Create the tokio runtime
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(server::run_server(cli.port, &cli.bind, state, cors_origins))
        .map_err(|e| anyhow::anyhow!(e))
}
