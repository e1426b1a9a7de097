use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory};
use dockmate::{
    cli::{AnsiStyles, DockmateArgs},
    config::{ManageConfig, Mapping, RestartPolicy, RunOptions},
    docker::DockerClient,
    lifecycle, lookup,
    manage::{self, ManageOptions, Manager},
    server::DockmateServer,
    utils, DockmateResult,
};
use serde::Serialize;

//--------------------------------------------------------------------------------------------------
// Functions: Handlers
//--------------------------------------------------------------------------------------------------

pub async fn container_subcommand(query: String) -> DockmateResult<()> {
    let client = DockerClient::connect()?;
    let container = lookup::find_container(&client, &query).await?;
    print_json(&container)
}

pub async fn image_subcommand(name: String, tag: Option<String>) -> DockmateResult<()> {
    let client = DockerClient::connect()?;
    let image = lookup::find_image(&client, &name, tag.as_deref()).await?;
    print_json(&image)
}

pub async fn run_subcommand(
    image: String,
    name: String,
    volumes: Vec<Mapping>,
    ports: Vec<Mapping>,
    env: Vec<Mapping>,
    restart: Option<RestartPolicy>,
    network: Option<String>,
) -> DockmateResult<()> {
    let options = RunOptions::builder()
        .image(image)
        .name(name)
        .volumes(volumes)
        .ports(ports)
        .env(env)
        .restart(restart)
        .network(network)
        .build();

    let client = DockerClient::connect()?;
    let container = lifecycle::run(&client, &options).await?;
    print_json(&container)
}

pub async fn suspend_subcommand(query: String, temp_name: Option<String>) -> DockmateResult<()> {
    let client = DockerClient::connect()?;
    let container = lookup::find_container(&client, &query).await?;
    let temp_name = temp_name.unwrap_or_else(|| manage::temporary_name(container.get_name()));

    lifecycle::suspend(&client, &container, &temp_name).await?;
    println!(
        "{} suspended as {}",
        container.get_name().literal(),
        temp_name.literal()
    );

    Ok(())
}

pub async fn resume_subcommand(query: String, name: String) -> DockmateResult<()> {
    let client = DockerClient::connect()?;
    let container = lookup::find_container(&client, &query).await?;

    lifecycle::resume(&client, &container, &name).await?;
    println!(
        "{} resumed as {}",
        container.get_name().literal(),
        name.literal()
    );

    Ok(())
}

pub async fn remove_subcommand(query: String) -> DockmateResult<()> {
    let client = DockerClient::connect()?;
    let container = lookup::find_container(&client, &query).await?;

    lifecycle::remove(&client, &container).await?;
    println!(
        "{} ({}) removed",
        container.get_name().literal(),
        container.short_id()
    );

    Ok(())
}

pub async fn manage_subcommand(
    config: PathBuf,
    mode: Option<String>,
    tag: Option<String>,
    force: bool,
    remove: bool,
    env_dir: Option<PathBuf>,
) -> DockmateResult<()> {
    if remove {
        if force {
            conflict_error("remove", "force", "manage", "<CONFIG>");
        }
        if tag.is_some() {
            conflict_error("remove", "tag", "manage", "<CONFIG>");
        }
    }

    let manage_config = ManageConfig::load(&config).await?;
    let env_dir = env_dir.unwrap_or_else(|| {
        config
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    let options = ManageOptions::new(tag, mode, force, remove).with_env_dir(env_dir);

    let manager = Manager::with_client(DockerClient::connect()?);
    let container = manager.manage(&manage_config, &options).await?;

    if remove {
        println!(
            "{} ({}) removed",
            container.get_name().literal(),
            container.short_id()
        );
        return Ok(());
    }

    print_json(&container)
}

pub async fn serve_subcommand(
    projects_dir: Option<PathBuf>,
    addr: SocketAddr,
    refresh_interval: u64,
) -> DockmateResult<()> {
    let server = DockmateServer::builder()
        .addr(addr)
        .projects_dir(projects_dir.unwrap_or_else(utils::projects_dir))
        .refresh_interval(Duration::from_secs(refresh_interval))
        .build();

    server.serve().await
}

//--------------------------------------------------------------------------------------------------
// Functions: Common Errors
//--------------------------------------------------------------------------------------------------

fn conflict_error(arg1: &str, arg2: &str, command: &str, positional_placeholder: &str) {
    DockmateArgs::command()
        .override_usage(usage(command, positional_placeholder))
        .error(
            ErrorKind::ArgumentConflict,
            format!(
                "cannot specify both `{}` and `{}` flags",
                format!("--{}", arg1).literal(),
                format!("--{}", arg2).literal()
            ),
        )
        .exit();
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

fn usage(command: &str, positional_placeholder: &str) -> String {
    format!(
        "{} {} {} {}",
        "dockmate".literal(),
        command.literal(),
        "[OPTIONS]".placeholder(),
        positional_placeholder.placeholder()
    )
}

fn print_json(value: &impl Serialize) -> DockmateResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
