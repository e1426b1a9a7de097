//! Route definitions for the HTTP server.
//!
//! This module sets up the routing for the REST API endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, state::ServerState};
use crate::docker::{ContainerLifecycle, ImageLookup};

//-------------------------------------------------------------------------------------------------
// Functions
//-------------------------------------------------------------------------------------------------

/// Creates a new router with all API endpoints configured
///
/// ## Arguments
/// * `state` - The shared server state
pub fn create_router<C, I>(state: ServerState<C, I>) -> Router
where
    C: ContainerLifecycle + 'static,
    I: ImageLookup + 'static,
{
    Router::new()
        .route("/projects", get(handlers::list_projects_handler::<C, I>))
        .route(
            "/projects/refresh",
            post(handlers::refresh_projects_handler::<C, I>),
        )
        .route(
            "/projects/{name}/manage",
            post(handlers::manage_project_handler::<C, I>),
        )
        .route(
            "/containers/{query}",
            get(handlers::container_handler::<C, I>),
        )
        .route("/images/{*name}", get(handlers::image_handler::<C, I>))
        .with_state(state)
}
