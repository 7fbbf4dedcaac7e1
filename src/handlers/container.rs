//! Single-container routes: inspect, start, stop, logs and stats.

use std::sync::Arc;
use std::time::Duration;

use futures_util::TryStreamExt;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::AppState;
use crate::error::{ApiError, ErrorKind};
use crate::format::{format_created, format_ports};
use crate::logs;
use crate::request::Request;
use crate::response::{ContentType, Json, Response};
use crate::runtime::RuntimeError;

/// Time a container gets to exit after the stop signal before it is killed.
pub const STOP_GRACE: Duration = Duration::from_secs(10);

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerView {
    #[serde(rename = "ID")]
    id: String,
    created: String,
    image: String,
    status: String,
    ports: String,
}

#[derive(Serialize)]
pub struct Message {
    message: String,
}

impl Message {
    fn new(message: String) -> Json<Self> {
        Json(Self { message })
    }
}

#[derive(Serialize)]
pub struct StatsView {
    cpu_usage: CpuUsage,
    memory_usage: MemoryUsage,
}

#[derive(Serialize)]
struct CpuUsage {
    total_usage: Option<u64>,
    usage_in_usermode: Option<u64>,
    system_cpu_usage: Option<u64>,
}

#[derive(Serialize)]
struct MemoryUsage {
    usage: Option<u64>,
    limit: Option<u64>,
}

fn container_id(req: &Request) -> &str {
    req.param("id").unwrap_or_default()
}

/// `GET /container/{id}`
pub async fn inspect(state: Arc<AppState>, req: Request) -> Result<Json<ContainerView>, ApiError> {
    let id = container_id(&req);
    let runtime = state.connect().await?;
    let detail = runtime
        .inspect_container(id)
        .await
        .map_err(|e| ApiError::runtime(ErrorKind::Inspect, &e))?;

    Ok(Json(ContainerView {
        created: format_created(&detail.created),
        ports: format_ports(&detail.ports),
        id: detail.id,
        image: detail.image,
        status: detail.status,
    }))
}

/// `GET /container-start/{id}`; a running container is left alone.
pub async fn start(state: Arc<AppState>, req: Request) -> Result<Json<Message>, ApiError> {
    let id = container_id(&req);
    let runtime = state.connect().await?;
    let detail = runtime
        .inspect_container(id)
        .await
        .map_err(|e| ApiError::runtime(ErrorKind::Inspect, &e))?;

    if detail.status == "running" {
        return Ok(Message::new(format!("Container {id} is already running")));
    }

    runtime
        .start_container(id)
        .await
        .map_err(|e| ApiError::runtime(ErrorKind::Start, &e))?;

    info!(id, "container started");
    Ok(Message::new(format!("Container {id} started successfully")))
}

/// `GET /container-stop/{id}`; an exited container is left alone.
pub async fn stop(state: Arc<AppState>, req: Request) -> Result<Json<Message>, ApiError> {
    let id = container_id(&req);
    let runtime = state.connect().await?;
    let detail = runtime
        .inspect_container(id)
        .await
        .map_err(|e| ApiError::runtime(ErrorKind::Inspect, &e))?;

    if detail.status == "exited" {
        return Ok(Message::new(format!("Container {id} is already exited")));
    }

    runtime
        .stop_container(id, STOP_GRACE)
        .await
        .map_err(|e| ApiError::runtime(ErrorKind::Stop, &e))?;

    info!(id, "container stopped");
    Ok(Message::new(format!("Container {id} stopped successfully")))
}

/// `GET /container-logs/{id}?page=N`
///
/// Reads the whole log into memory, then serves one sanitized page of it
/// as plain text. A page past the end is an empty `200`.
pub async fn logs(state: Arc<AppState>, req: Request) -> Result<Response, ApiError> {
    let id = container_id(&req);
    let page = parse_page(req.query("page"))?;

    let runtime = state.connect().await?;
    let mut stream = runtime
        .container_logs(id, true, true)
        .await
        .map_err(|e| ApiError::runtime(ErrorKind::Logs, &e))?;

    let mut raw = Vec::new();
    while let Some(chunk) = stream
        .try_next()
        .await
        .map_err(|e| ApiError::runtime(ErrorKind::ReadLogs, &e))?
    {
        raw.extend_from_slice(&chunk);
    }

    let body = logs::page(&raw, page)?;
    Ok(Response::bytes(ContentType::Text, body))
}

/// `GET /container-stats/{id}`
pub async fn stats(state: Arc<AppState>, req: Request) -> Result<Json<StatsView>, ApiError> {
    let id = container_id(&req);
    let runtime = state.connect().await?;
    let sample = runtime.container_stats(id).await.map_err(|e| {
        let kind = match &e {
            RuntimeError::Decode(_) => ErrorKind::DecodeStats,
            _ => ErrorKind::Stats,
        };
        ApiError::runtime(kind, &e)
    })?;

    Ok(Json(StatsView {
        cpu_usage: CpuUsage {
            total_usage: sample.total_usage,
            usage_in_usermode: sample.usage_in_usermode,
            system_cpu_usage: sample.system_cpu_usage,
        },
        memory_usage: MemoryUsage {
            usage: sample.memory_usage,
            limit: sample.memory_limit,
        },
    }))
}

/// Parses `?page=`, defaulting to 1. Anything that is not an integer of at
/// least 1 is rejected.
fn parse_page(raw: Option<&str>) -> Result<usize, ApiError> {
    let raw = raw.unwrap_or("1");
    raw.parse::<usize>()
        .ok()
        .filter(|&page| page >= 1)
        .ok_or_else(|| {
            warn!(page = raw, "rejected log page");
            ApiError::new(ErrorKind::InvalidPage)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(parse_page(None), Ok(1));
        assert_eq!(parse_page(Some("3")), Ok(3));
    }

    #[test]
    fn page_must_be_a_positive_integer() {
        for raw in ["0", "-1", "", "two", "1.5"] {
            let err = parse_page(Some(raw)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPage, "page={raw:?}");
        }
    }
}
