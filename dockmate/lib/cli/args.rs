use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

use crate::{
    config::{Mapping, RestartPolicy},
    utils::{DEFAULT_REFRESH_INTERVAL, DEFAULT_SERVER_ADDR},
};

use super::styles;

//-------------------------------------------------------------------------------------------------
// Types
//-------------------------------------------------------------------------------------------------

/// Dockmate CLI - Keeps Docker containers on the image versions you ask for
#[derive(Debug, Parser)]
#[command(
    name = "dockmate",
    author,
    about,
    version,
    disable_version_flag = true,
    styles = styles::styles()
)]
pub struct DockmateArgs {
    /// The subcommand to run
    #[command(subcommand)]
    pub subcommand: Option<DockmateSubcommand>,

    /// Enable verbose logging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// Write logs to this file instead of stdout
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Available subcommands for looking up and managing containers
#[derive(Debug, Parser)]
pub enum DockmateSubcommand {
    /// Show a container by name or id
    #[command(name = "container")]
    Container {
        /// Name, id or id prefix of the container
        query: String,
    },

    /// Show an image by repository and tag
    #[command(name = "image")]
    Image {
        /// Repository of the image
        name: String,

        /// Tag of the image, `latest` if omitted
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Create and start a container
    #[command(name = "run")]
    Run {
        /// Image to run, as `repo[:tag]`
        #[arg(long)]
        image: String,

        /// Name of the container
        #[arg(long)]
        name: String,

        /// Bind mount, as `HOST_PATH:CONTAINER_PATH`
        #[arg(short = 'v', long = "volume", value_name = "HOST:CONTAINER")]
        volumes: Vec<Mapping>,

        /// Published port, as `HOST_PORT:CONTAINER_PORT`
        #[arg(short = 'p', long = "port", value_name = "HOST:CONTAINER")]
        ports: Vec<Mapping>,

        /// Environment variable, as `KEY=VALUE`, or `KEY` to pass it from this environment
        #[arg(short = 'e', long = "env", value_name = "KEY=VALUE", value_parser = Mapping::from_env_str)]
        env: Vec<Mapping>,

        /// Restart policy: on-failure, unless-stopped or always
        #[arg(long)]
        restart: Option<RestartPolicy>,

        /// Network to attach the container to
        #[arg(long)]
        network: Option<String>,
    },

    /// Rename a container to a temporary name and stop it
    #[command(name = "suspend")]
    Suspend {
        /// Name, id or id prefix of the container
        query: String,

        /// Temporary name, random if omitted
        #[arg(long)]
        temp_name: Option<String>,
    },

    /// Rename a suspended container back and start it
    #[command(name = "resume")]
    Resume {
        /// Name, id or id prefix of the suspended container
        query: String,

        /// Name to restore
        #[arg(long)]
        name: String,
    },

    /// Remove a container, killing it first if it runs
    #[command(name = "remove")]
    Remove {
        /// Name, id or id prefix of the container
        query: String,
    },

    /// Run, replace or remove the container described by a configuration file
    #[command(name = "manage")]
    Manage {
        /// Path to the YAML configuration
        config: PathBuf,

        /// Mode to run in, the first declared mode if omitted
        #[arg(short, long)]
        mode: Option<String>,

        /// Image tag to run, `latest` if omitted
        #[arg(short, long)]
        tag: Option<String>,

        /// Replace the container even if it already runs the image
        #[arg(short, long)]
        force: bool,

        /// Remove the container instead of running it
        #[arg(short, long)]
        remove: bool,

        /// Directory holding environment override files, the configuration's directory if omitted
        #[arg(long)]
        env_dir: Option<PathBuf>,
    },

    /// Serve the projects of a directory over HTTP
    #[command(name = "serve")]
    Serve {
        /// Directory scanned for project configurations
        #[arg(long)]
        projects_dir: Option<PathBuf>,

        /// Address to listen on
        #[arg(long, default_value = DEFAULT_SERVER_ADDR)]
        addr: SocketAddr,

        /// Seconds between two rescans of the projects directory, 0 to disable
        #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs())]
        refresh_interval: u64,
    },
}

//-------------------------------------------------------------------------------------------------
// Tests
//-------------------------------------------------------------------------------------------------
