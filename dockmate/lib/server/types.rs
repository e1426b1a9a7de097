//! Type definitions for the server module.
//!
//! This module contains request and response types used by the REST API endpoints. The manage
//! endpoint takes a [`ManageOptions`](crate::manage::ManageOptions) body directly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::registry::Project;

//-------------------------------------------------------------------------------------------------
// Types
//-------------------------------------------------------------------------------------------------

/// A registered project as listed by the /projects endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Name of the project
    pub name: String,

    /// Path of the project's configuration file
    pub path: PathBuf,

    /// The image repository the project runs
    pub image_repo: String,

    /// The container name of each mode, in mode order
    pub containers: Vec<String>,
}

/// Response body for the /projects endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsResponse {
    /// The registered projects
    pub projects: Vec<ProjectSummary>,
}

/// Query parameters of the /images/{name} endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    /// Tag to look up instead of `latest`
    pub tag: Option<String>,
}

/// Error response returned when an operation fails
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

//-------------------------------------------------------------------------------------------------
// Trait Implementations
//-------------------------------------------------------------------------------------------------

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        let config = project.get_config();
        Self {
            name: project.get_name().clone(),
            path: project.get_path().clone(),
            image_repo: config.get_image_repo().clone(),
            containers: config
                .modes()
                .iter()
                .map(|mode| config.container_name(mode))
                .collect(),
        }
    }
}

impl From<&[Project]> for ProjectsResponse {
    fn from(projects: &[Project]) -> Self {
        Self {
            projects: projects.iter().map(ProjectSummary::from).collect(),
        }
    }
}
