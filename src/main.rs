//! CLI entry point for curlbind.

use anyhow::{Context, Result, bail};
use clap::Parser;
use curlbind::{CurlModule, Value};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

mod app_config;
mod cli;
mod runner;

use app_config::{FileConfig, load_default_file_config};
use cli::Args;
use runner::{TransferSettings, run_multi, run_sequential};

/// Readiness wait per multi drive step when neither flag nor config sets one.
const DEFAULT_POLL_TIMEOUT_SECS: f64 = 1.0;

fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let loaded = load_default_file_config()?;
    let file_config = loaded.config.clone().unwrap_or_default();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config > default (info)
    let default_level = if args.quiet {
        LevelFilter::ERROR
    } else {
        match args.verbose {
            0 => file_config.log_level.unwrap_or(LevelFilter::INFO),
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");
    if let Some(path) = &loaded.path {
        debug!(path = %path.display(), loaded = loaded.config.is_some(), "Config file resolved");
    }

    if args.urls.is_empty() {
        info!("No URLs provided.");
        info!("Example: curlbind --multi https://example.com/a https://example.com/b");
        return Ok(());
    }

    let settings = resolve_settings(&args, &file_config);
    let module = CurlModule::new();
    let all = module
        .constant("CURL_GLOBAL_ALL")
        .unwrap_or(Value::Int(curlbind::constants::global::ALL));
    module
        .call("curl_global_init", &[all])
        .context("Failed to initialize libcurl")?;

    info!(urls = args.urls.len(), multi = args.multi, "curlbind starting");
    let summaries = if args.multi {
        run_multi(&module, &args.urls, &settings)?
    } else {
        run_sequential(&module, &args.urls, &settings)?
    };

    let failed = summaries.iter().filter(|s| !s.succeeded()).count();
    info!(
        completed = summaries.len() - failed,
        failed,
        total = summaries.len(),
        "Transfers finished"
    );

    module.call("curl_global_cleanup", &[])?;

    if failed > 0 {
        bail!("{failed} of {} transfers failed", summaries.len());
    }
    Ok(())
}

/// Merges CLI flags over file config values.
fn resolve_settings(args: &Args, config: &FileConfig) -> TransferSettings {
    TransferSettings {
        headers: args.headers.clone(),
        user_agent: args.user_agent.clone().or_else(|| config.user_agent.clone()),
        timeout_secs: args.timeout.or(config.timeout_secs),
        connect_timeout_secs: args.connect_timeout.or(config.connect_timeout_secs),
        follow_location: args.location || config.follow_location.unwrap_or(false),
        progress: args.progress && !args.quiet && !args.json,
        json: args.json,
        poll_timeout_secs: args
            .poll_timeout
            .or(config.poll_timeout_secs)
            .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS)
            .max(0.0),
    }
}
