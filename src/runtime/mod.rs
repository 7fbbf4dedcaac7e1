//! The container runtime the service reports on.
//!
//! Handlers never talk to an engine directly. They ask a [`Connector`] for
//! a fresh [`Runtime`] client at the start of each request and drop it on
//! every exit path. [`docker`] provides the Docker Engine implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use serde::Serialize;
use thiserror::Error;

pub mod docker;

pub use docker::DockerConnector;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// A raw log stream, stdout and stderr interleaved in arrival order.
pub type LogStream = BoxStream<'static, Result<Bytes>>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Docker(#[from] bollard::errors::Error),

    #[error("invalid stats payload: {0}")]
    Decode(String),

    #[error("stats stream ended without a sample")]
    NoStats,
}

/// A `key=value` filter passed through to the engine's list call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListFilter {
    pub key: String,
    pub value: String,
}

impl ListFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerSummary {
    pub id: String,
    pub names: Vec<String>,
    pub image: String,
    /// Machine state, e.g. `running` or `exited`.
    pub state: String,
    /// Human status, e.g. `Up 3 hours`.
    pub status: String,
    pub labels: HashMap<String, String>,
    pub ports: Vec<PublishedPort>,
}

/// A port entry of a container listing. Serializes with the engine's field
/// names.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PublishedPort {
    #[serde(rename = "IP", skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(rename = "PrivatePort")]
    pub private_port: u16,
    #[serde(rename = "PublicPort", skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
    #[serde(rename = "Type")]
    pub protocol: String,
}

/// A host side of a published container port.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortBinding {
    pub host_ip: Option<String>,
    pub host_port: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerDetail {
    pub id: String,
    /// RFC 3339 creation time as reported by the engine.
    pub created: String,
    pub image: String,
    pub status: String,
    /// Container port (`80/tcp`) to its host bindings; empty when exposed
    /// but not published.
    pub ports: HashMap<String, Vec<PortBinding>>,
}

/// One resource usage sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsSnapshot {
    pub total_usage: Option<u64>,
    pub usage_in_usermode: Option<u64>,
    pub system_cpu_usage: Option<u64>,
    pub memory_usage: Option<u64>,
    pub memory_limit: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageSummary {
    pub id: String,
    pub repo_tags: Vec<String>,
    /// Unix seconds.
    pub created: i64,
    /// Bytes.
    pub size: i64,
    pub labels: HashMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VolumeSummary {
    pub name: String,
    pub driver: String,
    pub scope: String,
    pub mountpoint: String,
    pub labels: HashMap<String, String>,
}

/// A client for one container engine, held for the duration of a request.
#[async_trait]
pub trait Runtime: Send + Sync {
    async fn ping(&self) -> Result<()>;

    /// Lists containers; running ones only unless `all`.
    async fn list_containers(
        &self,
        all: bool,
        filter: Option<ListFilter>,
    ) -> Result<Vec<ContainerSummary>>;

    async fn inspect_container(&self, id: &str) -> Result<ContainerDetail>;

    async fn start_container(&self, id: &str) -> Result<()>;

    /// Stops a container, giving it `grace` before it is killed.
    async fn stop_container(&self, id: &str, grace: Duration) -> Result<()>;

    /// Opens the container's full log. Errors that prevent the log from
    /// being opened are returned here; errors while reading come through
    /// the stream.
    async fn container_logs(&self, id: &str, stdout: bool, stderr: bool) -> Result<LogStream>;

    /// Takes a single stats sample without streaming.
    async fn container_stats(&self, id: &str) -> Result<StatsSnapshot>;

    async fn list_images(&self) -> Result<Vec<ImageSummary>>;

    async fn list_volumes(&self) -> Result<Vec<VolumeSummary>>;
}

/// Produces request-scoped [`Runtime`] clients.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self) -> Result<Box<dyn Runtime>>;
}
