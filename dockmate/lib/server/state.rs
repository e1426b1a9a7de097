//! Server state management.
//!
//! This module provides the ServerState type which holds what the HTTP request handlers share:
//! the project registry and the container manager.

use std::sync::Arc;

use crate::{
    docker::{ContainerLifecycle, ImageLookup},
    manage::Manager,
    registry::ProjectRegistry,
};

//-------------------------------------------------------------------------------------------------
// Types
//-------------------------------------------------------------------------------------------------

/// Shared server state
pub struct ServerState<C, I> {
    /// The registered projects
    registry: ProjectRegistry,

    /// The manager running project containers
    manager: Arc<Manager<C, I>>,
}

//-------------------------------------------------------------------------------------------------
// Methods
//-------------------------------------------------------------------------------------------------

impl<C, I> ServerState<C, I>
where
    C: ContainerLifecycle,
    I: ImageLookup,
{
    /// Creates a new ServerState instance
    pub fn new(registry: ProjectRegistry, manager: Manager<C, I>) -> Self {
        Self {
            registry,
            manager: Arc::new(manager),
        }
    }

    /// Gets the project registry
    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    /// Gets the container manager
    pub fn manager(&self) -> &Manager<C, I> {
        &self.manager
    }
}

//-------------------------------------------------------------------------------------------------
// Trait Implementations
//-------------------------------------------------------------------------------------------------

impl<C, I> Clone for ServerState<C, I> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            manager: Arc::clone(&self.manager),
        }
    }
}
