mod handlers;

use std::path::Path;

use clap::{CommandFactory, Parser};
use dockmate::{
    cli::{AnsiStyles, DockmateArgs, DockmateSubcommand},
    DockmateResult,
};
use dockutils::LogSink;

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    let args = DockmateArgs::parse();

    let sink = match open_log_sink(args.log_file.as_deref(), args.verbose) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("{} {}", "error:".error(), e);
            std::process::exit(1);
        }
    };

    let result = run(args).await;
    sink.close();

    if let Err(e) = result {
        eprintln!("{} {}", "error:".error(), e);
        std::process::exit(1);
    }
}

async fn run(args: DockmateArgs) -> DockmateResult<()> {
    match args.subcommand {
        Some(DockmateSubcommand::Container { query }) => {
            handlers::container_subcommand(query).await?;
        }
        Some(DockmateSubcommand::Image { name, tag }) => {
            handlers::image_subcommand(name, tag).await?;
        }
        Some(DockmateSubcommand::Run {
            image,
            name,
            volumes,
            ports,
            env,
            restart,
            network,
        }) => {
            handlers::run_subcommand(image, name, volumes, ports, env, restart, network).await?;
        }
        Some(DockmateSubcommand::Suspend { query, temp_name }) => {
            handlers::suspend_subcommand(query, temp_name).await?;
        }
        Some(DockmateSubcommand::Resume { query, name }) => {
            handlers::resume_subcommand(query, name).await?;
        }
        Some(DockmateSubcommand::Remove { query }) => {
            handlers::remove_subcommand(query).await?;
        }
        Some(DockmateSubcommand::Manage {
            config,
            mode,
            tag,
            force,
            remove,
            env_dir,
        }) => {
            handlers::manage_subcommand(config, mode, tag, force, remove, env_dir).await?;
        }
        Some(DockmateSubcommand::Serve {
            projects_dir,
            addr,
            refresh_interval,
        }) => {
            handlers::serve_subcommand(projects_dir, addr, refresh_interval).await?;
        }
        None => {
            DockmateArgs::command().print_help()?;
        }
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

fn open_log_sink(log_file: Option<&Path>, verbose: bool) -> DockmateResult<LogSink> {
    let sink = match log_file {
        Some(path) => LogSink::open(path, None)?,
        None => LogSink::stdout(),
    };

    sink.install(if verbose { "debug" } else { "info" })?;
    Ok(sink)
}
