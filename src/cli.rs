//! Command-line surface. Minimal by design (§6): the process is runnable
//! with no arguments at all, using the compiled-in demo site.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "nightdriver-server", version, about = "Multi-site LED animation server")]
pub struct Cli {
    /// Path to a JSON site configuration. Falls back to one compiled-in demo
    /// site when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seconds between status lines printed to stdout.
    #[arg(long, default_value_t = 2)]
    pub status_interval_secs: u64,

    /// Minimum log level (`error`, `warn`, `info`, `debug`, `trace`).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
