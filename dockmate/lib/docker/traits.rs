use async_trait::async_trait;

use crate::{config::RunOptions, DockmateResult};

use super::{Container, Image};

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Container operations of a Docker client.
#[async_trait]
pub trait ContainerLifecycle: Send + Sync {
    /// Lists all containers, including stopped ones.
    async fn list_containers(&self) -> DockmateResult<Vec<Container>>;

    /// Returns a fresh snapshot of the container with the given id or name.
    async fn inspect_container(&self, id: &str) -> DockmateResult<Container>;

    /// Creates (but does not start) a container and returns its id.
    async fn create_container(&self, options: &RunOptions) -> DockmateResult<String>;

    /// Starts a container.
    async fn start_container(&self, id: &str) -> DockmateResult<()>;

    /// Stops a running container.
    async fn stop_container(&self, id: &str) -> DockmateResult<()>;

    /// Removes a container, killing it first if it runs.
    async fn remove_container(&self, id: &str) -> DockmateResult<()>;

    /// Renames a container.
    async fn rename_container(&self, id: &str, name: &str) -> DockmateResult<()>;
}

/// Image operations of a Docker client.
#[async_trait]
pub trait ImageLookup: Send + Sync {
    /// Lists local images.
    async fn list_images(&self) -> DockmateResult<Vec<Image>>;
}
