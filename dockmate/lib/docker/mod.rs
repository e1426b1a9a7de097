//! Access to the Docker Engine API.
//!
//! The rest of the crate talks to Docker through two capability traits:
//! - [`ContainerLifecycle`] lists, inspects, creates, starts, stops, renames and removes containers
//! - [`ImageLookup`] lists local images
//!
//! [`DockerClient`] implements both on top of `bollard`, bounding every call by a fixed timeout.

mod client;
mod models;
mod traits;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use client::*;
pub use models::*;
pub use traits::*;
