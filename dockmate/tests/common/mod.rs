//! An in-memory Docker used by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use dockmate::{
    config::RunOptions,
    docker::{Container, ContainerLifecycle, Image, ImageLookup},
    lookup, DockmateError, DockmateResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A fake Docker daemon implementing both capability traits.
///
/// Every call is recorded. Failures are injected per operation and consumed in order, so
/// `fail("start")` makes only the next start fail.
#[derive(Clone, Default)]
pub struct FakeDocker {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    containers: Vec<Container>,
    images: Vec<Image>,
    calls: Vec<String>,
    created: Vec<RunOptions>,
    failures: Vec<&'static str>,
    next_id: u64,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl FakeDocker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a local image.
    pub fn with_image(self, id: &str, tags: &[&str]) -> Self {
        self.lock().images.push(Image::new(id, tags.iter().copied()));
        self
    }

    /// Adds a running container and returns its id.
    pub fn add_running(&self, name: &str, image: &str, image_id: &str) -> String {
        let mut state = self.lock();
        let id = state.next_container_id();
        state.containers.push(
            Container::builder()
                .id(id.clone())
                .name(name)
                .image(image)
                .image_id(image_id)
                .state("running")
                .build(),
        );
        id
    }

    /// Makes the next call of `operation` fail.
    pub fn fail(&self, operation: &'static str) {
        self.lock().failures.push(operation);
    }

    /// Returns all calls made so far, e.g. `start <id>`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Returns the calls that change containers.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| !call.starts_with("list") && !call.starts_with("inspect"))
            .collect()
    }

    /// Returns all containers.
    pub fn containers(&self) -> Vec<Container> {
        self.lock().containers.clone()
    }

    /// Returns the container named `name`.
    pub fn container(&self, name: &str) -> Option<Container> {
        self.lock()
            .containers
            .iter()
            .find(|c| c.get_name() == name)
            .cloned()
    }

    /// Returns the options of every created container.
    pub fn created(&self) -> Vec<RunOptions> {
        self.lock().created.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

impl FakeState {
    fn next_container_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:012x}{}", self.next_id, "f".repeat(52))
    }

    /// Records the call and fails it if a failure is pending for `operation`.
    fn call(&mut self, operation: &'static str, target: &str) -> DockmateResult<()> {
        self.calls.push(format!("{} {}", operation, target));
        match self.failures.iter().position(|failure| *failure == operation) {
            Some(index) => {
                self.failures.remove(index);
                Err(DockmateError::custom(anyhow::anyhow!(
                    "{} {} failed",
                    operation,
                    target
                )))
            }
            None => Ok(()),
        }
    }

    fn position(&self, id: &str) -> DockmateResult<usize> {
        self.containers
            .iter()
            .position(|c| c.get_id() == id)
            .ok_or_else(|| DockmateError::ContainerNotFound(id.to_string()))
    }

    fn set(&mut self, id: &str, update: impl FnOnce(&Container) -> Container) -> DockmateResult<()> {
        let index = self.position(id)?;
        self.containers[index] = update(&self.containers[index]);
        Ok(())
    }
}

fn with_state(container: &Container, state: &str) -> Container {
    Container::builder()
        .id(container.get_id().clone())
        .name(container.get_name())
        .image(container.get_image().clone())
        .image_id(container.get_image_id().clone())
        .state(state)
        .build()
}

fn with_name(container: &Container, name: &str) -> Container {
    Container::builder()
        .id(container.get_id().clone())
        .name(name)
        .image(container.get_image().clone())
        .image_id(container.get_image_id().clone())
        .state(container.get_state().clone())
        .build()
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl ContainerLifecycle for FakeDocker {
    async fn list_containers(&self) -> DockmateResult<Vec<Container>> {
        let mut state = self.lock();
        state.call("list_containers", "")?;
        Ok(state.containers.clone())
    }

    async fn inspect_container(&self, id: &str) -> DockmateResult<Container> {
        let mut state = self.lock();
        state.call("inspect", id)?;
        let index = state.position(id)?;
        Ok(state.containers[index].clone())
    }

    async fn create_container(&self, options: &RunOptions) -> DockmateResult<String> {
        let mut state = self.lock();
        state.call("create", options.get_name())?;

        if state
            .containers
            .iter()
            .any(|c| c.get_name() == options.get_name())
        {
            return Err(DockmateError::custom(anyhow::anyhow!(
                "name {} is already in use",
                options.get_name()
            )));
        }

        let image = lookup::match_image(&state.images, options.get_image())
            .ok_or_else(|| DockmateError::ImageNotFound(options.get_image().clone()))?
            .clone();

        let id = state.next_container_id();
        state.containers.push(
            Container::builder()
                .id(id.clone())
                .name(options.get_name())
                .image(options.get_image().clone())
                .image_id(image.get_id().clone())
                .state("created")
                .build(),
        );
        state.created.push(options.clone());

        Ok(id)
    }

    async fn start_container(&self, id: &str) -> DockmateResult<()> {
        let mut state = self.lock();
        state.call("start", id)?;
        state.set(id, |c| with_state(c, "running"))
    }

    async fn stop_container(&self, id: &str) -> DockmateResult<()> {
        let mut state = self.lock();
        state.call("stop", id)?;
        state.set(id, |c| with_state(c, "exited"))
    }

    async fn remove_container(&self, id: &str) -> DockmateResult<()> {
        let mut state = self.lock();
        state.call("remove", id)?;
        let index = state.position(id)?;
        state.containers.remove(index);
        Ok(())
    }

    async fn rename_container(&self, id: &str, name: &str) -> DockmateResult<()> {
        let mut state = self.lock();
        state.call("rename", &format!("{} {}", id, name))?;

        if state
            .containers
            .iter()
            .any(|c| c.get_name() == name && c.get_id() != id)
        {
            return Err(DockmateError::custom(anyhow::anyhow!(
                "name {} is already in use",
                name
            )));
        }

        state.set(id, |c| with_name(c, name))
    }
}

#[async_trait]
impl ImageLookup for FakeDocker {
    async fn list_images(&self) -> DockmateResult<Vec<Image>> {
        let mut state = self.lock();
        state.call("list_images", "")?;
        Ok(state.images.clone())
    }
}
