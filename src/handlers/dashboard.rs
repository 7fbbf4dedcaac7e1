//! `GET /dashboard`: container counts plus the running containers.

use std::sync::Arc;

use serde::Serialize;

use super::{ContainerRow, rows};
use crate::api::AppState;
use crate::error::{ApiError, ErrorKind};
use crate::request::Request;
use crate::response::Json;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    total_containers: usize,
    total_running_containers: usize,
    containers: Option<Vec<ContainerRow>>,
}

pub async fn summary(state: Arc<AppState>, _req: Request) -> Result<Json<Summary>, ApiError> {
    let runtime = state.connect().await?;

    let all = runtime
        .list_containers(true, None)
        .await
        .map_err(|e| ApiError::runtime(ErrorKind::List, &e))?;
    let running = runtime
        .list_containers(false, None)
        .await
        .map_err(|e| ApiError::runtime(ErrorKind::List, &e))?;

    Ok(Json(Summary {
        total_containers: all.len(),
        total_running_containers: running.len(),
        containers: rows(running),
    }))
}
