//! HTTP request handlers for the REST API.
//!
//! This module implements the handlers for each API endpoint. Each handler delegates to a
//! `handle_*` function returning a [`DockmateResult`] and turns its outcome into a JSON response.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::{
    state::ServerState,
    types::{ErrorResponse, ImageQuery, ProjectsResponse},
};
use crate::{
    docker::{Container, ContainerLifecycle, Image, ImageLookup},
    lookup,
    manage::ManageOptions,
    DockmateError, DockmateResult,
};

//-------------------------------------------------------------------------------------------------
// Functions: Handlers
//-------------------------------------------------------------------------------------------------

/// Handler for the GET /projects endpoint
pub async fn list_projects_handler<C, I>(State(state): State<ServerState<C, I>>) -> Response
where
    C: ContainerLifecycle + 'static,
    I: ImageLookup + 'static,
{
    respond(Ok(handle_list_projects(&state).await))
}

/// Handler for the POST /projects/refresh endpoint
///
/// Rescans the projects directory, joining a scan that is already running
pub async fn refresh_projects_handler<C, I>(State(state): State<ServerState<C, I>>) -> Response
where
    C: ContainerLifecycle + 'static,
    I: ImageLookup + 'static,
{
    respond(handle_refresh_projects(&state).await)
}

/// Handler for the POST /projects/{name}/manage endpoint
pub async fn manage_project_handler<C, I>(
    State(state): State<ServerState<C, I>>,
    Path(name): Path<String>,
    Json(options): Json<ManageOptions>,
) -> Response
where
    C: ContainerLifecycle + 'static,
    I: ImageLookup + 'static,
{
    respond(handle_manage_project(&state, &name, options).await)
}

/// Handler for the GET /containers/{query} endpoint
pub async fn container_handler<C, I>(
    State(state): State<ServerState<C, I>>,
    Path(query): Path<String>,
) -> Response
where
    C: ContainerLifecycle + 'static,
    I: ImageLookup + 'static,
{
    respond(handle_container(&state, &query).await)
}

/// Handler for the GET /images/{name} endpoint
pub async fn image_handler<C, I>(
    State(state): State<ServerState<C, I>>,
    Path(name): Path<String>,
    Query(query): Query<ImageQuery>,
) -> Response
where
    C: ContainerLifecycle + 'static,
    I: ImageLookup + 'static,
{
    respond(handle_image(&state, &name, query.tag.as_deref()).await)
}

//-------------------------------------------------------------------------------------------------
// Functions: Implementations
//-------------------------------------------------------------------------------------------------

/// Lists the registered projects
pub async fn handle_list_projects<C, I>(state: &ServerState<C, I>) -> ProjectsResponse
where
    C: ContainerLifecycle,
    I: ImageLookup,
{
    ProjectsResponse::from(state.registry().projects().await.as_slice())
}

/// Refreshes the registry and lists the projects it now holds
pub async fn handle_refresh_projects<C, I>(
    state: &ServerState<C, I>,
) -> DockmateResult<ProjectsResponse>
where
    C: ContainerLifecycle,
    I: ImageLookup,
{
    let projects = state.registry().refresh().await?;
    Ok(ProjectsResponse::from(projects.as_slice()))
}

/// Manages the container of project `name`, reading environment overrides from the project's
/// directory
pub async fn handle_manage_project<C, I>(
    state: &ServerState<C, I>,
    name: &str,
    options: ManageOptions,
) -> DockmateResult<Container>
where
    C: ContainerLifecycle,
    I: ImageLookup,
{
    let project = state.registry().project(name).await?;
    let options = options.with_env_dir(project.dir());

    state
        .manager()
        .manage(project.get_config(), &options)
        .await
}

/// Looks up a container by name or id
pub async fn handle_container<C, I>(
    state: &ServerState<C, I>,
    query: &str,
) -> DockmateResult<Container>
where
    C: ContainerLifecycle,
    I: ImageLookup,
{
    lookup::find_container(state.manager().containers(), query).await
}

/// Looks up an image by repo and optional tag
pub async fn handle_image<C, I>(
    state: &ServerState<C, I>,
    name: &str,
    tag: Option<&str>,
) -> DockmateResult<Image>
where
    C: ContainerLifecycle,
    I: ImageLookup,
{
    lookup::find_image(state.manager().images(), name, tag).await
}

//-------------------------------------------------------------------------------------------------
// Functions: Helpers
//-------------------------------------------------------------------------------------------------

/// Returns the HTTP status an error is reported with
pub fn error_status(error: &DockmateError) -> StatusCode {
    if error.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn respond<T: Serialize>(result: DockmateResult<T>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            tracing::warn!("request failed: {}", e);
            (
                error_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
