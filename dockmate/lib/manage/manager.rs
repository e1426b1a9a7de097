use std::path::PathBuf;

use getset::Getters;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    config::{load_env_file, ManageConfig, RunOptions},
    docker::{Container, ContainerLifecycle, DockerClient, ImageLookup},
    lifecycle, lookup, DockmateError, DockmateResult,
};

use super::{names, Decision};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Replaces containers with newer image versions as described by a [`ManageConfig`].
///
/// The manager needs both container and image access. They usually come from the same client:
///
/// ```no_run
/// use dockmate::{
///     config::ManageConfig,
///     docker::DockerClient,
///     manage::{ManageOptions, Manager},
/// };
///
/// # async fn example() -> dockmate::DockmateResult<()> {
/// let manager = Manager::with_client(DockerClient::connect()?);
/// let config = ManageConfig::load("svc.yaml").await?;
/// let options = ManageOptions::builder().tag("2").mode("prod").build();
///
/// let container = manager.manage(&config, &options).await?;
/// println!("{} runs {}", container.get_name(), container.get_image_id());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Manager<C, I> {
    /// Container access.
    containers: C,

    /// Image access.
    images: I,
}

/// How a single manage operation should go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder, Getters)]
#[getset(get = "pub with_prefix")]
pub struct ManageOptions {
    /// Pins the image to this tag instead of `latest`.
    #[serde(default)]
    #[builder(default, setter(strip_option, into))]
    tag: Option<String>,

    /// The mode to run in, defaults to the first declared mode.
    #[serde(default)]
    #[builder(default, setter(strip_option, into))]
    mode: Option<String>,

    /// Replaces the container even when it already runs the requested image.
    #[serde(default)]
    #[builder(default)]
    force: bool,

    /// Removes the container instead of running it.
    #[serde(default)]
    #[builder(default)]
    remove: bool,

    /// The directory holding environment override files.
    #[serde(skip)]
    #[builder(default, setter(strip_option, into))]
    env_dir: Option<PathBuf>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ManageOptions {
    /// Creates options without an environment override directory.
    pub fn new(tag: Option<String>, mode: Option<String>, force: bool, remove: bool) -> Self {
        Self {
            tag,
            mode,
            force,
            remove,
            env_dir: None,
        }
    }

    /// Sets the directory holding environment override files.
    pub fn with_env_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.env_dir = Some(dir.into());
        self
    }
}

impl<C, I> Manager<C, I>
where
    C: ContainerLifecycle,
    I: ImageLookup,
{
    /// Creates a new manager.
    pub fn new(containers: C, images: I) -> Self {
        Self { containers, images }
    }

    /// Returns the container access.
    pub fn containers(&self) -> &C {
        &self.containers
    }

    /// Returns the image access.
    pub fn images(&self) -> &I {
        &self.images
    }

    /// Brings the container described by `config` to the state `options` asks for.
    ///
    /// - With `remove`, the container is removed and its last snapshot returned.
    /// - Without a container under the target name, a new one is run.
    /// - A container already running the requested image fails with
    ///   [`DockmateError::ContainerAlreadyRunning`], unless `force` is set.
    /// - Otherwise the container is replaced, see [`Manager::replace`].
    pub async fn manage(
        &self,
        config: &ManageConfig,
        options: &ManageOptions,
    ) -> DockmateResult<Container> {
        let (mode_index, mode) = config.resolve_mode(options.mode.as_deref())?;
        let name = config.container_name(&mode);
        let existing = lookup::find_container_by_name(&self.containers, &name).await?;

        // A removal never needs the image.
        let decision = if options.remove {
            Decision::for_removal(existing, &name)?
        } else {
            let image =
                lookup::find_image(&self.images, config.get_image_repo(), options.tag.as_deref())
                    .await?;
            Decision::for_image(existing, &image, options.force)
        };

        tracing::debug!("managing container {}: {:?}", name, decision);

        match decision {
            Decision::Remove(container) => {
                lifecycle::remove(&self.containers, &container).await?;
                Ok(container)
            }
            Decision::AlreadyRunning(container) => Err(DockmateError::ContainerAlreadyRunning(
                container.get_name().clone(),
            )),
            Decision::Run => {
                let run_options = build_run_options(config, options, &name, mode_index, &mode)?;
                lifecycle::run(&self.containers, &run_options).await
            }
            Decision::Replace(container) => {
                let run_options = build_run_options(config, options, &name, mode_index, &mode)?;
                self.replace(&container, &run_options).await
            }
        }
    }

    /// Replaces `old` with a new container created from `options`.
    ///
    /// 1. `old` is renamed to a temporary name and stopped. A failure here is returned as is.
    /// 2. The new container is created and started under the target name.
    /// 3. If that fails, `old` is renamed back and started again. If restoring it fails too, both
    ///    errors are returned as [`DockmateError::RollbackFailed`].
    /// 4. Otherwise `old` is removed. A removal failure is returned although the new container
    ///    runs. So is a failure to fetch the new container's snapshot afterwards.
    pub async fn replace(
        &self,
        old: &Container,
        options: &RunOptions,
    ) -> DockmateResult<Container> {
        let temp_name = names::temporary_name(options.get_name());
        lifecycle::suspend(&self.containers, old, &temp_name).await?;

        // Once the new container has started it owns the target name, so only create and start
        // failures roll back.
        match lifecycle::create_and_start(&self.containers, options).await {
            Ok(id) => {
                if let Err(e) = lifecycle::remove(&self.containers, old).await {
                    tracing::error!(
                        "container {} runs but suspended container {} ({}) could not be removed: {}",
                        options.get_name(),
                        temp_name,
                        old.short_id(),
                        e
                    );
                    return Err(e);
                }

                let new = self.containers.inspect_container(&id).await?;
                tracing::info!(
                    "replaced container {} ({} -> {})",
                    new.get_name(),
                    old.short_id(),
                    new.short_id()
                );
                Ok(new)
            }
            Err(original) => {
                tracing::warn!(
                    "failed to run replacement for {}, restoring {}: {}",
                    options.get_name(),
                    old.short_id(),
                    original
                );

                match lifecycle::resume(&self.containers, old, options.get_name()).await {
                    Ok(()) => Err(original),
                    Err(rollback) => {
                        tracing::error!(
                            "failed to restore container {} ({}): {}",
                            options.get_name(),
                            old.short_id(),
                            rollback
                        );
                        Err(DockmateError::RollbackFailed {
                            original: Box::new(original),
                            rollback: Box::new(rollback),
                        })
                    }
                }
            }
        }
    }
}

impl Manager<DockerClient, DockerClient> {
    /// Creates a manager that uses `client` for both container and image access.
    pub fn with_client(client: DockerClient) -> Self {
        Self::new(client.clone(), client)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Merges the configuration, the selected mode and the environment override file into the
/// options of the container to run.
pub fn build_run_options(
    config: &ManageConfig,
    options: &ManageOptions,
    name: &str,
    mode_index: usize,
    mode: &str,
) -> DockmateResult<RunOptions> {
    let ports = config.port_mappings(config.mode_port_offset(mode_index))?;

    let mut env = config.get_env().clone();
    if let Some(dir) = &options.env_dir {
        env.extend(load_env_file(dir, mode)?);
    }

    Ok(RunOptions::builder()
        .image(config.image_reference(options.tag.as_deref()))
        .name(name)
        .volumes(config.get_volumes().clone())
        .ports(ports)
        .env(env)
        .restart(*config.get_restart())
        .network(config.get_network().clone())
        .build())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
