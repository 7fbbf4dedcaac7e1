//! `GET /docker-compose`: containers grouped by compose project.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::short_id;
use crate::api::AppState;
use crate::error::{ApiError, ErrorKind};
use crate::request::Request;
use crate::response::Json;
use crate::runtime::{ContainerSummary, ListFilter, PublishedPort};

pub const PROJECT_LABEL: &str = "com.docker.compose.project";
pub const SERVICE_LABEL: &str = "com.docker.compose.service";

#[derive(Serialize)]
pub struct ServiceRow {
    service_name: String,
    container_id: String,
    status: String,
    image: String,
    ports: Vec<PublishedPort>,
}

/// Project name to its containers, serialized with keys in sorted order.
pub type Projects = BTreeMap<String, Vec<ServiceRow>>;

pub async fn projects(state: Arc<AppState>, _req: Request) -> Result<Json<Projects>, ApiError> {
    let runtime = state.connect().await?;
    let containers = runtime
        .list_containers(true, Some(ListFilter::new("label", PROJECT_LABEL)))
        .await
        .map_err(|e| {
            ApiError::runtime(ErrorKind::List, &e).with_message("Failed to list Docker containers")
        })?;

    Ok(Json(group_by_project(containers)))
}

/// Groups containers by their project label, skipping those with an empty
/// one.
///
/// Only the ports at even positions (0, 2, 4, ...) of each container are
/// kept.
// TODO: decide whether to dedupe ports by (private, public, type) instead of by position.
pub fn group_by_project(containers: Vec<ContainerSummary>) -> Projects {
    let mut projects = Projects::new();

    for mut container in containers {
        let project = container.labels.remove(PROJECT_LABEL).unwrap_or_default();
        if project.is_empty() {
            continue;
        }
        let service = container.labels.remove(SERVICE_LABEL).unwrap_or_default();

        let ports = container.ports.into_iter().step_by(2).collect();

        projects.entry(project).or_default().push(ServiceRow {
            service_name: service,
            container_id: short_id(&container.id).to_owned(),
            status: container.status,
            image: container.image,
            ports,
        });
    }

    projects
}
