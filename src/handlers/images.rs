//! `GET /images`

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::non_empty;
use crate::api::AppState;
use crate::error::{ApiError, ErrorKind};
use crate::request::Request;
use crate::response::Json;
use crate::runtime::ImageSummary;

const MIB: i64 = 1024 * 1024;

/// Empty tags and labels serialize as `[]` and `{}`; the engine client
/// never reports them as absent.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageRow {
    #[serde(rename = "ID")]
    id: String,
    repo_tags: Vec<String>,
    created: i64,
    /// Whole MiB, rounded down.
    size: i64,
    labels: HashMap<String, String>,
}

impl From<ImageSummary> for ImageRow {
    fn from(image: ImageSummary) -> Self {
        Self {
            id: image.id,
            repo_tags: image.repo_tags,
            created: image.created,
            size: image.size / MIB,
            labels: image.labels,
        }
    }
}

pub async fn list(state: Arc<AppState>, _req: Request) -> Result<Json<Option<Vec<ImageRow>>>, ApiError> {
    let runtime = state.connect().await?;
    let images = runtime.list_images().await.map_err(|e| {
        ApiError::runtime(ErrorKind::List, &e).with_message("Failed to fetch images")
    })?;

    Ok(Json(non_empty(images.into_iter().map(ImageRow::from).collect())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_reported_in_whole_mebibytes() {
        let row = ImageRow::from(ImageSummary {
            id: "sha256:abc".to_owned(),
            size: 3 * MIB - 1,
            ..Default::default()
        });
        assert_eq!(row.size, 2);
    }

    #[test]
    fn untagged_image_keeps_empty_collections() {
        let row = ImageRow::from(ImageSummary {
            id: "sha256:dangling".to_owned(),
            created: 1_700_000_000,
            ..Default::default()
        });
        assert_eq!(
            serde_json::to_value(row).unwrap(),
            serde_json::json!({
                "ID": "sha256:dangling",
                "RepoTags": [],
                "Created": 1_700_000_000,
                "Size": 0,
                "Labels": {},
            })
        );
    }
}
