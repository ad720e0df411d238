//! Jenkins MCP server entry point.
//!
//! Reads the Jenkins connection settings from the environment, then serves
//! the tool catalog to an MCP client over stdin/stdout. All diagnostics go
//! to stderr; stdout belongs to the protocol channel.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use jenkins_client::{JenkinsClient, JenkinsConfig};
use rmcp::{service::ServiceExt, transport::stdio};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod server;
mod tools;

use crate::server::JenkinsService;

/// Serve Jenkins job and build operations to MCP clients over stdio.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Load environment variables from this file instead of `.env`.
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match JenkinsConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            eprintln!(
                "Set JENKINS_URL, JENKINS_USERNAME and JENKINS_API_TOKEN, or provide them in a .env file."
            );
            std::process::exit(1);
        }
    };

    info!(base_url = config.base_url(), "connecting to jenkins");
    let service = JenkinsService::new(JenkinsClient::new(config));

    eprintln!("{} Starting Jenkins MCP stdio server...", style("→").cyan());

    let (stdin, stdout) = stdio();
    let running = service
        .serve((stdin, stdout))
        .await
        .context("failed to start MCP stdio server")?;

    eprintln!("{} Jenkins MCP server running", style("✓").green().bold());

    let cancel = running.cancellation_token();
    let mut waiting = Box::pin(running.waiting());

    tokio::select! {
        result = &mut waiting => {
            result.context("mcp stdio server exited")?;
        }
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
            cancel.cancel();
            let _ = waiting.await;
        }
    }

    info!("Jenkins MCP server stopped");
    Ok(())
}
