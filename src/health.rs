//! Liveness and readiness handlers.
//!
//! | Path | Question |
//! |---|---|
//! | `/ping` | Does the API answer? Always `{"message":"pong"}`. |
//! | `/healthz` | Is the process alive? |
//! | `/readyz` | Can the container engine be reached? |

use std::sync::Arc;

use http::StatusCode;
use serde_json::{Value, json};
use tracing::warn;

use crate::api::AppState;
use crate::{Json, Request, Response};

pub async fn ping(_req: Request) -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// Always `200 OK` with body `"ok"`; it has no dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"` once the engine answers a ping,
/// `503 Service Unavailable` otherwise.
pub async fn readiness(state: Arc<AppState>, _req: Request) -> Response {
    let ready = match state.connect().await {
        Ok(runtime) => runtime
            .ping()
            .await
            .inspect_err(|e| warn!("runtime ping failed: {e}"))
            .is_ok(),
        Err(_) => false,
    };

    if ready {
        Response::text("ready")
    } else {
        Response::status(StatusCode::SERVICE_UNAVAILABLE)
    }
}
