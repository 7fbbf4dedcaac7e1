//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(name = "loglens", version)]
#[command(about = "HTTP backend for a Docker dashboard: containers, logs, stats, images and volumes")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "LOGLENS_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Directory holding index.html and the dashboard's static assets
    #[arg(long, env = "LOGLENS_STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,

    /// Tracing filter, e.g. `info` or `loglens=debug`
    #[arg(long, env = "LOGLENS_LOG", default_value = "info")]
    pub log_level: String,
}
