//! Docker Engine runtime over `bollard`.
//!
//! Connection settings are ambient: `DOCKER_HOST` or the local socket,
//! with the API version negotiated against the daemon on connect.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    InspectContainerOptions, ListContainersOptions, LogOutput, LogsOptions,
    StartContainerOptions, StatsOptions, StopContainerOptions,
};
use bollard::image::ListImagesOptions;
use bollard::models;
use bollard::volume::ListVolumesOptions;
use futures_util::{Stream, StreamExt, stream};
use tracing::debug;

use super::{
    Connector, ContainerDetail, ContainerSummary, ImageSummary, ListFilter, LogStream,
    PortBinding, PublishedPort, Result, Runtime, RuntimeError, StatsSnapshot, VolumeSummary,
};

/// Connects to the local Docker daemon, once per call.
#[derive(Clone, Debug, Default)]
pub struct DockerConnector;

impl DockerConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for DockerConnector {
    async fn connect(&self) -> Result<Box<dyn Runtime>> {
        let docker = Docker::connect_with_local_defaults()?
            .negotiate_version()
            .await?;
        debug!("connected to docker engine");
        Ok(Box::new(DockerRuntime { docker }))
    }
}

pub struct DockerRuntime {
    docker: Docker,
}

#[async_trait]
impl Runtime for DockerRuntime {
    async fn ping(&self) -> Result<()> {
        self.docker.ping().await?;
        Ok(())
    }

    async fn list_containers(
        &self,
        all: bool,
        filter: Option<ListFilter>,
    ) -> Result<Vec<ContainerSummary>> {
        let mut filters = HashMap::new();
        if let Some(ListFilter { key, value }) = filter {
            filters.insert(key, vec![value]);
        }
        debug!(all, ?filters, "listing containers");

        let options = ListContainersOptions::<String> { all, filters, ..Default::default() };
        let containers = self.docker.list_containers(Some(options)).await?;
        Ok(containers.into_iter().map(container_summary).collect())
    }

    async fn inspect_container(&self, id: &str) -> Result<ContainerDetail> {
        debug!(id, "inspecting container");
        let inspected = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        Ok(container_detail(inspected))
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn stop_container(&self, id: &str, grace: Duration) -> Result<()> {
        let t = i64::try_from(grace.as_secs()).unwrap_or(i64::MAX);
        self.docker
            .stop_container(id, Some(StopContainerOptions { t }))
            .await?;
        Ok(())
    }

    async fn container_logs(&self, id: &str, stdout: bool, stderr: bool) -> Result<LogStream> {
        debug!(id, stdout, stderr, "opening container logs");
        let options = LogsOptions::<String> { stdout, stderr, ..Default::default() };
        open_log_stream(self.docker.logs(id, Some(options))).await
    }

    async fn container_stats(&self, id: &str) -> Result<StatsSnapshot> {
        debug!(id, "sampling container stats");
        let options = StatsOptions { stream: false, one_shot: false };
        let mut samples = Box::pin(self.docker.stats(id, Some(options)));

        let sample = samples
            .next()
            .await
            .ok_or(RuntimeError::NoStats)?
            .map_err(stats_error)?;

        Ok(StatsSnapshot {
            total_usage: Some(sample.cpu_stats.cpu_usage.total_usage),
            usage_in_usermode: Some(sample.cpu_stats.cpu_usage.usage_in_usermode),
            system_cpu_usage: sample.cpu_stats.system_cpu_usage,
            memory_usage: sample.memory_stats.usage,
            memory_limit: sample.memory_stats.limit,
        })
    }

    async fn list_images(&self) -> Result<Vec<ImageSummary>> {
        let images = self
            .docker
            .list_images(Some(ListImagesOptions::<String>::default()))
            .await?;
        Ok(images
            .into_iter()
            .map(|image| ImageSummary {
                id: image.id,
                repo_tags: image.repo_tags,
                created: image.created,
                size: image.size,
                labels: image.labels,
            })
            .collect())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeSummary>> {
        let response = self
            .docker
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await?;
        Ok(response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|volume| VolumeSummary {
                name: volume.name,
                driver: volume.driver,
                scope: volume.scope.map(|s| s.to_string()).unwrap_or_default(),
                mountpoint: volume.mountpoint,
                labels: volume.labels,
            })
            .collect())
    }
}

/// Pulls the first frame eagerly. The engine reports an unknown container
/// there, so an error at that point means the log could not be opened;
/// later errors are read failures and travel through the returned stream.
async fn open_log_stream<S>(frames: S) -> Result<LogStream>
where
    S: Stream<Item = std::result::Result<LogOutput, bollard::errors::Error>> + Send + 'static,
{
    let mut frames = Box::pin(frames);
    let first = match frames.next().await {
        Some(Err(e)) => return Err(e.into()),
        first => first,
    };

    let chunks = stream::iter(first)
        .chain(frames)
        .map(|frame| frame.map(LogOutput::into_bytes).map_err(RuntimeError::from));
    Ok(chunks.boxed())
}

fn stats_error(err: bollard::errors::Error) -> RuntimeError {
    use bollard::errors::Error;

    match err {
        Error::JsonDataError { message, .. } => RuntimeError::Decode(message),
        Error::JsonSerdeError { err } => RuntimeError::Decode(err.to_string()),
        other => other.into(),
    }
}

fn container_summary(c: models::ContainerSummary) -> ContainerSummary {
    ContainerSummary {
        id: c.id.unwrap_or_default(),
        names: c.names.unwrap_or_default(),
        image: c.image.unwrap_or_default(),
        state: c.state.map(|s| s.to_string()).unwrap_or_default(),
        status: c.status.unwrap_or_default(),
        labels: c.labels.unwrap_or_default(),
        ports: c
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(|p| PublishedPort {
                ip: p.ip,
                private_port: p.private_port,
                public_port: p.public_port,
                protocol: p.typ.map(|t| t.to_string()).unwrap_or_default(),
            })
            .collect(),
    }
}

fn container_detail(c: models::ContainerInspectResponse) -> ContainerDetail {
    let image = c.config.and_then(|config| config.image).unwrap_or_default();

    let ports = c
        .network_settings
        .and_then(|settings| settings.ports)
        .unwrap_or_default()
        .into_iter()
        .map(|(port, bindings)| {
            let bindings = bindings
                .unwrap_or_default()
                .into_iter()
                .map(|b| PortBinding { host_ip: b.host_ip, host_port: b.host_port })
                .collect();
            (port, bindings)
        })
        .collect();

    ContainerDetail {
        id: c.id.unwrap_or_default(),
        created: c.created.unwrap_or_default(),
        image,
        status: c
            .state
            .and_then(|state| state.status)
            .map(|status| status.to_string())
            .unwrap_or_default(),
        ports,
    }
}
