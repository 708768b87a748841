//! FellowSheep Proxy server binary.

use anyhow::Result;
use clap::Parser;
use fellowsheep_core::config::ApiConfig;
use fellowsheep_proxy::{start_server, UpstreamClient};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "fellowsheep-proxy")]
#[command(about = "API proxy for the FellowSheep Gaming site")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Leaderboard provider base URL
    #[arg(long, env = "AOE_API_BASE", default_value = ApiConfig::UPSTREAM_BASE)]
    upstream: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting FellowSheep proxy");
    info!("Upstream: {}", args.upstream);

    let upstream = UpstreamClient::new(&args.upstream)?;
    let addr = start_server(upstream, &args.host, args.port).await?;

    println!("FellowSheep proxy listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
