use std::{collections::HashMap, future::Future, time::Duration};

use async_trait::async_trait;
use bollard::{
    container::{
        Config, CreateContainerOptions, InspectContainerOptions, ListContainersOptions,
        RemoveContainerOptions, RenameContainerOptions, StartContainerOptions,
        StopContainerOptions,
    },
    image::ListImagesOptions,
    models::{HostConfig, PortBinding, RestartPolicy as DockerRestartPolicy, RestartPolicyNameEnum},
    Docker,
};

use crate::{
    config::{RestartPolicy, RunOptions},
    utils, DockmateError, DockmateResult,
};

use super::{Container, ContainerLifecycle, Image, ImageLookup};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A Docker Engine API client whose calls give up after a fixed timeout.
#[derive(Debug, Clone)]
pub struct DockerClient {
    /// The underlying API client.
    docker: Docker,

    /// How long a single API call may take.
    timeout: Duration,

    /// How long a container gets to exit on stop before it is killed.
    stop_grace: Duration,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DockerClient {
    /// Wraps an existing `bollard` client.
    pub fn new(docker: Docker, timeout: Duration) -> Self {
        Self {
            docker,
            timeout,
            stop_grace: utils::DEFAULT_STOP_GRACE,
        }
    }

    /// Connects to the local Docker daemon (honouring `DOCKER_HOST`) with the configured timeout.
    pub fn connect() -> DockmateResult<Self> {
        Self::connect_with_timeout(utils::docker_timeout())
    }

    /// Connects to the local Docker daemon with the given per-call timeout.
    pub fn connect_with_timeout(timeout: Duration) -> DockmateResult<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        tracing::debug!("connected to docker with a {:?} call timeout", timeout);
        Ok(Self::new(docker, timeout))
    }

    /// Returns the per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns how long a stop call may take: the grace period Docker waits before killing the
    /// container comes on top of the per-call timeout.
    pub fn stop_timeout(&self) -> Duration {
        stop_timeout(self.timeout, self.stop_grace)
    }

    async fn call<T, F>(&self, operation: &'static str, request: F) -> DockmateResult<T>
    where
        F: Future<Output = Result<T, bollard::errors::Error>>,
    {
        within(operation, self.timeout, request).await
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn stop_timeout(timeout: Duration, stop_grace: Duration) -> Duration {
    timeout + stop_grace
}

/// Awaits `request` for at most `timeout`.
async fn within<T, F>(operation: &'static str, timeout: Duration, request: F) -> DockmateResult<T>
where
    F: Future<Output = Result<T, bollard::errors::Error>>,
{
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(DockmateError::Timeout { operation, timeout }),
    }
}

/// Builds the `bollard` create request for `options`.
fn create_config(options: &RunOptions) -> Config<String> {
    let mut exposed_ports = HashMap::new();
    let mut port_bindings = HashMap::new();
    for port in options.get_ports() {
        let key = container_port_key(port.get_target());
        exposed_ports.insert(key.clone(), HashMap::new());
        port_bindings.insert(
            key,
            Some(vec![PortBinding {
                host_ip: None,
                host_port: Some(port.get_source().clone()),
            }]),
        );
    }

    let binds = options
        .get_volumes()
        .iter()
        .map(|volume| format!("{}:{}", volume.get_source(), volume.get_target()))
        .collect();

    let host_config = HostConfig {
        binds: Some(binds),
        port_bindings: Some(port_bindings),
        restart_policy: (*options.get_restart()).map(|policy| DockerRestartPolicy {
            name: Some(policy.into()),
            maximum_retry_count: None,
        }),
        network_mode: options.get_network().clone(),
        ..Default::default()
    };

    Config {
        image: Some(options.get_image().clone()),
        env: Some(options.env_list()),
        exposed_ports: Some(exposed_ports),
        host_config: Some(host_config),
        ..Default::default()
    }
}

/// Returns the `port/protocol` key Docker expects, defaulting to tcp.
fn container_port_key(port: &str) -> String {
    if port.contains('/') {
        port.to_string()
    } else {
        format!("{}/tcp", port)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl ContainerLifecycle for DockerClient {
    async fn list_containers(&self) -> DockmateResult<Vec<Container>> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };

        let containers = self
            .call("list containers", self.docker.list_containers(Some(options)))
            .await?;

        Ok(containers.into_iter().map(Container::from).collect())
    }

    async fn inspect_container(&self, id: &str) -> DockmateResult<Container> {
        let response = self
            .call(
                "inspect container",
                self.docker
                    .inspect_container(id, None::<InspectContainerOptions>),
            )
            .await?;

        Ok(Container::from(response))
    }

    async fn create_container(&self, options: &RunOptions) -> DockmateResult<String> {
        let create_options = CreateContainerOptions {
            name: options.get_name().clone(),
            platform: None,
        };

        let response = self
            .call(
                "create container",
                self.docker
                    .create_container(Some(create_options), create_config(options)),
            )
            .await?;

        for warning in &response.warnings {
            tracing::warn!("docker warning creating {}: {}", options.get_name(), warning);
        }

        Ok(response.id)
    }

    async fn start_container(&self, id: &str) -> DockmateResult<()> {
        self.call(
            "start container",
            self.docker
                .start_container(id, None::<StartContainerOptions<String>>),
        )
        .await
    }

    async fn stop_container(&self, id: &str) -> DockmateResult<()> {
        let options = StopContainerOptions {
            t: self.stop_grace.as_secs() as i64,
        };

        within(
            "stop container",
            self.stop_timeout(),
            self.docker.stop_container(id, Some(options)),
        )
        .await
    }

    async fn remove_container(&self, id: &str) -> DockmateResult<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };

        self.call(
            "remove container",
            self.docker.remove_container(id, Some(options)),
        )
        .await
    }

    async fn rename_container(&self, id: &str, name: &str) -> DockmateResult<()> {
        let options = RenameContainerOptions {
            name: name.to_string(),
        };

        self.call(
            "rename container",
            self.docker.rename_container(id, options),
        )
        .await
    }
}

#[async_trait]
impl ImageLookup for DockerClient {
    async fn list_images(&self) -> DockmateResult<Vec<Image>> {
        let options = ListImagesOptions::<String> {
            all: false,
            ..Default::default()
        };

        let images = self
            .call("list images", self.docker.list_images(Some(options)))
            .await?;

        Ok(images.into_iter().map(Image::from).collect())
    }
}

impl From<RestartPolicy> for RestartPolicyNameEnum {
    fn from(policy: RestartPolicy) -> Self {
        match policy {
            RestartPolicy::OnFailure => RestartPolicyNameEnum::ON_FAILURE,
            RestartPolicy::UnlessStopped => RestartPolicyNameEnum::UNLESS_STOPPED,
            RestartPolicy::Always => RestartPolicyNameEnum::ALWAYS,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::config::Mapping;

    use super::*;

    #[tokio::test]
    async fn test_within_times_out_slow_requests() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, bollard::errors::Error>(())
        };

        let result = within("stop container", Duration::from_millis(20), slow).await;
        assert!(matches!(
            result,
            Err(DockmateError::Timeout {
                operation: "stop container",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_stop_timeout_outlasts_grace_period() -> anyhow::Result<()> {
        let timeout = Duration::from_millis(20);
        let stop_grace = Duration::from_millis(400);
        assert!(stop_timeout(timeout, stop_grace) > stop_grace);

        // A container that ignores SIGTERM takes about the grace period to stop.
        let stop = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, bollard::errors::Error>(())
        };
        within("stop container", stop_timeout(timeout, stop_grace), stop).await?;

        Ok(())
    }

    #[test]
    fn test_create_config_maps_run_options() {
        let options = RunOptions::builder()
            .image("svc:2")
            .name("svc")
            .volumes(vec![Mapping::new("/srv/data", "/data")])
            .ports(vec![Mapping::new("8080", "80"), Mapping::new("5353", "53/udp")])
            .env(vec![Mapping::new("MODE", "prod")])
            .restart(Some(RestartPolicy::UnlessStopped))
            .network(Some("backend".to_string()))
            .build();

        let config = create_config(&options);
        assert_eq!(config.image.as_deref(), Some("svc:2"));
        assert_eq!(config.env, Some(vec!["MODE=prod".to_string()]));

        let exposed = config.exposed_ports.unwrap();
        assert!(exposed.contains_key("80/tcp"));
        assert!(exposed.contains_key("53/udp"));

        let host_config = config.host_config.unwrap();
        assert_eq!(host_config.binds, Some(vec!["/srv/data:/data".to_string()]));
        assert_eq!(host_config.network_mode.as_deref(), Some("backend"));
        assert_eq!(
            host_config.restart_policy.unwrap().name,
            Some(RestartPolicyNameEnum::UNLESS_STOPPED)
        );

        let bindings = host_config.port_bindings.unwrap();
        let binding = bindings["80/tcp"].as_ref().unwrap();
        assert_eq!(binding[0].host_port.as_deref(), Some("8080"));
    }
}
