//! Container lifecycle operations: run, suspend, resume and remove.

use crate::{
    config::RunOptions,
    docker::{Container, ContainerLifecycle},
    DockmateResult,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates and starts a container, returning a fresh snapshot of it.
///
/// See [`create_and_start`] for what happens when the container cannot be started.
pub async fn run<C>(client: &C, options: &RunOptions) -> DockmateResult<Container>
where
    C: ContainerLifecycle + ?Sized,
{
    let id = create_and_start(client, options).await?;
    client.inspect_container(&id).await
}

/// Creates and starts a container and returns its id.
///
/// If the container cannot be started it is removed again and the start error is returned. A
/// failure of that cleanup is only logged, the start error already explains what went wrong.
pub async fn create_and_start<C>(client: &C, options: &RunOptions) -> DockmateResult<String>
where
    C: ContainerLifecycle + ?Sized,
{
    let id = client.create_container(options).await?;
    tracing::info!(
        "created container {} ({}) from {}",
        options.get_name(),
        id,
        options.get_image()
    );

    if let Err(e) = client.start_container(&id).await {
        tracing::warn!("failed to start container {}: {}", options.get_name(), e);
        if let Err(cleanup) = client.remove_container(&id).await {
            tracing::warn!("failed to remove unstarted container {}: {}", id, cleanup);
        }

        return Err(e);
    }

    tracing::info!("started container {}", options.get_name());
    Ok(id)
}

/// Renames `container` to `temp_name` and stops it, keeping it around for a later [`resume`].
///
/// Stops at the first failing step, leaving the container as that step left it.
pub async fn suspend<C>(client: &C, container: &Container, temp_name: &str) -> DockmateResult<()>
where
    C: ContainerLifecycle + ?Sized,
{
    client.rename_container(container.get_id(), temp_name).await?;
    client.stop_container(container.get_id()).await?;

    tracing::info!(
        "suspended container {} ({}) as {}",
        container.get_name(),
        container.short_id(),
        temp_name
    );

    Ok(())
}

/// Renames a suspended `container` back to `name` and starts it again.
pub async fn resume<C>(client: &C, container: &Container, name: &str) -> DockmateResult<()>
where
    C: ContainerLifecycle + ?Sized,
{
    client.rename_container(container.get_id(), name).await?;
    client.start_container(container.get_id()).await?;

    tracing::info!("resumed container {} ({})", name, container.short_id());

    Ok(())
}

/// Removes `container`, killing it first if it runs.
pub async fn remove<C>(client: &C, container: &Container) -> DockmateResult<()>
where
    C: ContainerLifecycle + ?Sized,
{
    client.remove_container(container.get_id()).await?;
    tracing::info!(
        "removed container {} ({})",
        container.get_name(),
        container.short_id()
    );

    Ok(())
}
