use std::{net::SocketAddr, path::PathBuf, time::Duration};

use getset::Getters;
use tokio::net::TcpListener;
use typed_builder::TypedBuilder;

use crate::{
    docker::DockerClient,
    manage::Manager,
    registry::ProjectRegistry,
    utils::{self, DEFAULT_REFRESH_INTERVAL},
    DockmateResult,
};

use super::{routes::create_router, state::ServerState};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The dockmate API server.
///
/// Serves the projects found under `projects_dir` and rescans it every `refresh_interval`. A zero
/// interval disables the periodic rescan.
#[derive(Debug, Clone, TypedBuilder, Getters)]
#[getset(get = "pub with_prefix")]
pub struct DockmateServer {
    /// Address to listen on
    addr: SocketAddr,

    /// Directory scanned for project configurations
    #[builder(default = utils::projects_dir(), setter(into))]
    projects_dir: PathBuf,

    /// Time between two rescans of the projects directory
    #[builder(default = DEFAULT_REFRESH_INTERVAL)]
    refresh_interval: Duration,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DockmateServer {
    /// Scans the projects directory, then serves the API until interrupted with ctrl-c.
    ///
    /// A scan that gives up, initially or on a later refresh, shuts the server down and is
    /// returned as the error.
    pub async fn serve(&self) -> DockmateResult<()> {
        let client = DockerClient::connect()?;

        let registry = ProjectRegistry::new(&self.projects_dir);
        registry.refresh().await?;

        let refresher = (!self.refresh_interval.is_zero()).then(|| {
            let registry = registry.clone();
            let period = self.refresh_interval;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                // The first tick completes immediately and the registry was just scanned.
                interval.tick().await;
                loop {
                    interval.tick().await;
                    tracing::debug!("refreshing projects in {}", registry.root().display());
                    if registry.refresh().await.is_err() {
                        break;
                    }
                }
            })
        });

        let state = ServerState::new(registry.clone(), Manager::with_client(client));
        let app = create_router(state);

        tracing::info!("server listening on {}", self.addr);

        let result = axum::serve(TcpListener::bind(self.addr).await?, app)
            .with_graceful_shutdown({
                let registry = registry.clone();
                async move {
                    tokio::select! {
                        result = tokio::signal::ctrl_c() => {
                            if let Err(e) = result {
                                tracing::error!("failed to listen for ctrl-c: {}", e);
                            }
                        }
                        e = registry.failed() => {
                            tracing::error!("shutting down: {}", e);
                        }
                    }
                }
            })
            .await;

        if let Some(refresher) = refresher {
            refresher.abort();
        }

        tracing::info!("server stopped");
        result?;

        match registry.failure() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
