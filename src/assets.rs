//! Static dashboard assets.
//!
//! `/` serves `index.html` from the static directory and `/static/{*path}`
//! anything below it. Paths that try to leave the directory are not found.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use http::StatusCode;
use tracing::warn;

use crate::api::AppState;
use crate::request::Request;
use crate::response::{ContentType, Response};

pub async fn index(state: Arc<AppState>, _req: Request) -> Response {
    let path = state.static_dir().join("index.html");
    match read(&path).await {
        Some(body) => Response::bytes(ContentType::Html, body),
        None => Response::status(StatusCode::NOT_FOUND),
    }
}

pub async fn file(state: Arc<AppState>, req: Request) -> Response {
    let Some(path) = req.param("path").and_then(|rel| resolve(state.static_dir(), rel)) else {
        return Response::status(StatusCode::NOT_FOUND);
    };
    match read(&path).await {
        Some(body) => Response::bytes(ContentType::from_path(&path), body),
        None => Response::status(StatusCode::NOT_FOUND),
    }
}

/// Joins `rel` onto `root` if every component of it is a plain name.
fn resolve(root: &Path, rel: &str) -> Option<PathBuf> {
    let rel = Path::new(rel);
    if rel.as_os_str().is_empty() || !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    Some(root.join(rel))
}

async fn read(path: &Path) -> Option<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(body) => Some(body),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), "failed to read asset: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_nested_names() {
        assert_eq!(
            resolve(Path::new("static"), "js/containers.js"),
            Some(PathBuf::from("static/js/containers.js"))
        );
    }

    #[test]
    fn rejects_escapes_and_empty_paths() {
        let root = Path::new("static");
        assert_eq!(resolve(root, "../Cargo.toml"), None);
        assert_eq!(resolve(root, "js/../../secret"), None);
        assert_eq!(resolve(root, "/etc/passwd"), None);
        assert_eq!(resolve(root, ""), None);
    }
}
