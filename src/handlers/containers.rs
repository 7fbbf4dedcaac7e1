//! `GET /containers?filter=all|running|stopped`

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::{ContainerRow, rows};
use crate::api::AppState;
use crate::error::{ApiError, ErrorKind};
use crate::request::Request;
use crate::response::Json;
use crate::runtime::ListFilter;

/// Which containers a listing covers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Scope {
    #[default]
    All,
    Running,
    Stopped,
}

impl Scope {
    /// The `all` flag and engine filter that select this scope.
    fn query(self) -> (bool, Option<ListFilter>) {
        match self {
            Self::All     => (true, None),
            Self::Running => (false, None),
            Self::Stopped => (true, Some(ListFilter::new("status", "exited"))),
        }
    }
}

impl FromStr for Scope {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all"     => Ok(Self::All),
            "running" => Ok(Self::Running),
            "stopped" => Ok(Self::Stopped),
            _         => Err(ApiError::new(ErrorKind::InvalidFilter)),
        }
    }
}

#[derive(Serialize)]
pub struct ContainerList {
    containers: Option<Vec<ContainerRow>>,
}

pub async fn list(state: Arc<AppState>, req: Request) -> Result<Json<ContainerList>, ApiError> {
    let scope = match req.query("filter") {
        None => Scope::default(),
        Some(raw) => raw
            .parse::<Scope>()
            .inspect_err(|_| warn!(filter = raw, "rejected container filter"))?,
    };

    let runtime = state.connect().await?;
    let (all, filter) = scope.query();
    let containers = runtime
        .list_containers(all, filter)
        .await
        .map_err(|e| ApiError::runtime(ErrorKind::List, &e))?;

    Ok(Json(ContainerList { containers: rows(containers) }))
}
