//! CLI argument definitions using clap derive macros.

use clap::Parser;

/// Drive libcurl transfers through the scripting binding.
///
/// Each URL becomes one easy handle. Transfers run one at a time by default,
/// or concurrently through a single multi handle with `--multi`.
#[derive(Parser, Debug)]
#[command(name = "curlbind")]
#[command(author, version, about)]
pub struct Args {
    /// URLs to transfer
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Run all transfers concurrently on one multi handle
    #[arg(short, long)]
    pub multi: bool,

    /// Extra request header, repeatable ("Name: value")
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// User-Agent header sent with every request
    #[arg(short = 'A', long)]
    pub user_agent: Option<String>,

    /// Whole-transfer timeout in seconds (1-3600)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Connect timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// Follow redirects
    #[arg(short = 'L', long)]
    pub location: bool,

    /// Seconds to wait for socket readiness per multi drive step
    #[arg(long, value_name = "SECS")]
    pub poll_timeout: Option<f64>,

    /// Show a progress bar per transfer
    #[arg(short, long)]
    pub progress: bool,

    /// Print a JSON summary per transfer instead of the body
    #[arg(long)]
    pub json: bool,
}
