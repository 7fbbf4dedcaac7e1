//! `GET /volumes`

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::non_empty;
use crate::api::AppState;
use crate::error::{ApiError, ErrorKind};
use crate::request::Request;
use crate::response::Json;
use crate::runtime::VolumeSummary;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeRow {
    name: String,
    driver: String,
    scope: String,
    /// Where the volume lives on the host.
    mounted: String,
    labels: HashMap<String, String>,
}

impl From<VolumeSummary> for VolumeRow {
    fn from(volume: VolumeSummary) -> Self {
        Self {
            name: volume.name,
            driver: volume.driver,
            scope: volume.scope,
            mounted: volume.mountpoint,
            labels: volume.labels,
        }
    }
}

pub async fn list(state: Arc<AppState>, _req: Request) -> Result<Json<Option<Vec<VolumeRow>>>, ApiError> {
    let runtime = state.connect().await?;
    let volumes = runtime.list_volumes().await.map_err(|e| {
        ApiError::runtime(ErrorKind::List, &e).with_message("Failed to fetch volumes")
    })?;

    Ok(Json(non_empty(volumes.into_iter().map(VolumeRow::from).collect())))
}
