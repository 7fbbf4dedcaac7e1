//! Application state and route table.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ApiError, ErrorKind};
use crate::handler::Handler;
use crate::request::Request;
use crate::response::IntoResponse;
use crate::router::Router;
use crate::runtime::{Connector, Runtime};
use crate::{assets, handlers, health};

/// State shared by every handler.
pub struct AppState {
    connector: Arc<dyn Connector>,
    static_dir: PathBuf,
}

impl AppState {
    pub fn new(connector: Arc<dyn Connector>, static_dir: impl Into<PathBuf>) -> Self {
        Self { connector, static_dir: static_dir.into() }
    }

    /// Opens a runtime client for the current request. The client is
    /// released when the returned box is dropped.
    pub async fn connect(&self) -> Result<Box<dyn Runtime>, ApiError> {
        self.connector
            .connect()
            .await
            .map_err(|e| ApiError::runtime(ErrorKind::ClientUnavailable, &e))
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }
}

/// Builds the router with every route of the service.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .get("/ping",                     health::ping)
        .get("/healthz",                  health::liveness)
        .get("/readyz",                   with_state(&state, health::readiness))
        .get("/containers",               with_state(&state, handlers::containers::list))
        .get("/container/{id}",           with_state(&state, handlers::container::inspect))
        .get("/container-start/{id}",     with_state(&state, handlers::container::start))
        .get("/container-stop/{id}",      with_state(&state, handlers::container::stop))
        .get("/container-logs/{id}",      with_state(&state, handlers::container::logs))
        .get("/container-stats/{id}",     with_state(&state, handlers::container::stats))
        .get("/images",                   with_state(&state, handlers::images::list))
        .get("/volumes",                  with_state(&state, handlers::volumes::list))
        .get("/docker-compose",           with_state(&state, handlers::compose::projects))
        .get("/dashboard",                with_state(&state, handlers::dashboard::summary))
        .get("/",                         with_state(&state, assets::index))
        .get("/static/{*path}",           with_state(&state, assets::file))
}

/// Adapts `f(state, req)` into a plain handler capturing `state`.
fn with_state<F, Fut, R>(state: &Arc<AppState>, f: F) -> impl Handler
where
    F: Fn(Arc<AppState>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    let state = Arc::clone(state);
    move |req: Request| f(Arc::clone(&state), req)
}
