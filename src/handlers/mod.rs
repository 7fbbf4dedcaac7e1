//! Route handlers, one module per resource.
//!
//! Every handler opens a runtime client, makes its engine call and reshapes
//! the result. Failures become an [`ApiError`](crate::ApiError) with a fixed
//! message; the engine's own error text only reaches the log.

pub mod compose;
pub mod container;
pub mod containers;
pub mod dashboard;
pub mod images;
pub mod volumes;

use serde::Serialize;

use crate::runtime::ContainerSummary;

/// Length of the abbreviated container ID shown to clients.
const SHORT_ID_LEN: usize = 12;

/// First twelve characters of `id`, or all of it when shorter.
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Serializes an empty list as `null`, the way the dashboard expects.
pub(crate) fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

/// A container as it appears in list views.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerRow {
    #[serde(rename = "ID")]
    id: String,
    image: String,
    names: Vec<String>,
    state: String,
}

impl From<ContainerSummary> for ContainerRow {
    fn from(c: ContainerSummary) -> Self {
        Self {
            id: short_id(&c.id).to_owned(),
            image: c.image,
            names: c.names,
            state: c.state,
        }
    }
}

pub(crate) fn rows(containers: Vec<ContainerSummary>) -> Option<Vec<ContainerRow>> {
    non_empty(containers.into_iter().map(ContainerRow::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_to_twelve() {
        assert_eq!(short_id("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn row_uses_dashboard_field_names() {
        let row = ContainerRow::from(ContainerSummary {
            id: "0123456789abcdef".to_owned(),
            names: vec!["/web".to_owned()],
            image: "nginx".to_owned(),
            state: "running".to_owned(),
            ..Default::default()
        });
        assert_eq!(
            serde_json::to_value(row).unwrap(),
            serde_json::json!({
                "ID": "0123456789ab",
                "Image": "nginx",
                "Names": ["/web"],
                "State": "running",
            })
        );
    }
}
