//! Server module for dockmate's remote management functionality.
//!
//! The server exposes the registered projects and container lookups through a REST API:
//! - `GET /projects` lists the registered projects
//! - `POST /projects/refresh` rescans the projects directory
//! - `POST /projects/{name}/manage` runs, replaces or removes a project's container
//! - `GET /containers/{query}` and `GET /images/{name}?tag=` look up containers and images

mod api;
mod handlers;
mod routes;
mod state;
mod types;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use api::*;
pub use handlers::*;
pub use routes::*;
pub use state::*;
pub use types::*;
