//! Warden CLI
//!
//! Runs the HTTP server, triggers jobs on a running server and manages config.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use warden_cli::config_handlers::handle_config_command;
use warden_cli::{Args, Command, WardenConfig, logging, runtime};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config.as_deref();

    // Config commands must work even when the file is broken.
    if let Command::Config { action } = args.command {
        return handle_config_command(config_path, action).map_err(Into::into);
    }

    let config = WardenConfig::load(config_path).context("loading configuration")?;
    logging::init(&config.logging.level)?;

    match args.command {
        Command::Serve => runtime::serve(&config).await?,
        Command::RunJob {
            name,
            server,
            token,
        } => {
            let base = server.unwrap_or_else(|| runtime::server_url(&config.server.bind));
            let report = runtime::trigger_job(&base, &name, token.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            let failed = report["failed"].as_array().map_or(0, Vec::len);
            if failed > 0 {
                anyhow::bail!("{failed} units of job '{name}' failed");
            }
        }
        Command::Jobs => {
            let tz = config.jobs.tz()?;
            for listing in runtime::job_listings(&config, Utc::now())? {
                let next = listing.next.map_or_else(
                    || "-".to_string(),
                    |next| next.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string(),
                );
                println!("{:<16} {:<20} next: {next}", listing.job.as_str(), listing.schedule.to_string());
            }
        }
        Command::Config { .. } => {}
    }
    Ok(())
}
