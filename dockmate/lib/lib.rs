//! `dockmate` keeps Docker containers running the image versions you ask for.
//!
//! # Overview
//!
//! A container is described by a small YAML configuration (see [`config::ManageConfig`]): the
//! image repository, ports, volumes, environment, restart policy and the deployment modes it can
//! run in. Managing it means looking up the container that currently holds its name and then:
//! - running a new container if there is none
//! - leaving it alone if it already runs the requested image
//! - replacing it otherwise, restoring the old container if the new one fails to start
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use dockmate::{
//!     config::ManageConfig,
//!     docker::DockerClient,
//!     manage::{ManageOptions, Manager},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ManageConfig::from_yaml(
//!         r#"
//! image_repo: my-service
//! ports: [8080]
//! modes: [prod, dev]
//! "#,
//!     )?;
//!
//!     let manager = Manager::with_client(DockerClient::connect()?);
//!     let options = ManageOptions::builder().mode("dev").tag("2").build();
//!     let container = manager.manage(&config, &options).await?;
//!
//!     println!("{} is running {}", container.get_name(), container.get_image());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Mappings, run options and stored configurations
//! - [`docker`] - Docker Engine API access behind capability traits
//! - [`lifecycle`] - Run, suspend, resume and remove containers
//! - [`lookup`] - Find containers and images by name, id or tag
//! - [`manage`] - Decide between running, keeping and replacing a container
//! - [`registry`] - Projects found in a directory of configurations
//! - [`server`] - REST API server implementation
//! - [`utils`] - Defaults and environment settings

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod cli;
pub mod config;
pub mod docker;
pub mod lifecycle;
pub mod lookup;
pub mod manage;
pub mod registry;
pub mod server;
pub mod utils;

pub use error::*;
