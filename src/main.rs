use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use loglens::Server;
use loglens::api::{AppState, create_router};
use loglens::config::Config;
use loglens::runtime::DockerConnector;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(static_dir = %config.static_dir.display(), "starting loglens");

    let state = Arc::new(AppState::new(Arc::new(DockerConnector::new()), config.static_dir));
    let app = create_router(state);

    match Server::bind(config.listen).serve(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
