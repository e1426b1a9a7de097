//! The project registry.
//!
//! A project is a [`ManageConfig`] YAML file found under the registry's root directory, either
//! directly (`<root>/svc.yaml`) or one level down (`<root>/svc/svc.yaml`). The project is named
//! after the file stem and its directory holds the project's environment override files.
//!
//! Refreshes go through a [`Batcher`], so any number of concurrent refresh requests cost a single
//! scan of the root.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use dockutils::Batcher;
use getset::Getters;
use serde::Serialize;
use tokio::sync::{watch, RwLock};
use walkdir::WalkDir;

use crate::{
    config::ManageConfig,
    utils::{DEFAULT_SCAN_ATTEMPTS, DEFAULT_SCAN_BACKOFF},
    DockmateError, DockmateResult,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The file extensions of project configuration files.
pub const PROJECT_FILE_EXTENSIONS: &[&str] = &["yaml", "yml"];

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A managed container configuration registered from a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[getset(get = "pub with_prefix")]
pub struct Project {
    /// The project name, the configuration file's stem.
    name: String,

    /// The configuration file.
    path: PathBuf,

    /// The parsed configuration.
    config: ManageConfig,
}

/// The projects found under a root directory.
#[derive(Clone)]
pub struct ProjectRegistry {
    /// The scanned directory.
    root: PathBuf,

    /// The snapshot of the last successful scan.
    projects: Arc<RwLock<Arc<Vec<Project>>>>,

    /// Collapses concurrent refreshes.
    batcher: Batcher,

    /// The reason the last scan gave up, cleared by the next successful scan.
    failure: Arc<watch::Sender<Option<String>>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Project {
    /// Returns the directory holding the project's configuration and environment files.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl ProjectRegistry {
    /// Creates an empty registry over `root`. Call [`ProjectRegistry::refresh`] to scan it.
    ///
    /// A scan that keeps failing is fatal: after [`DEFAULT_SCAN_ATTEMPTS`] attempts the error is
    /// logged and reported through [`ProjectRegistry::refresh`] and [`ProjectRegistry::failed`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_retry(root, DEFAULT_SCAN_ATTEMPTS, DEFAULT_SCAN_BACKOFF)
    }

    /// Creates an empty registry over `root` that attempts a scan `attempts` times, pausing for
    /// `backoff` after each failure, before giving up.
    pub fn with_retry(root: impl Into<PathBuf>, attempts: usize, backoff: Duration) -> Self {
        let root = root.into();
        let projects = Arc::new(RwLock::new(Arc::new(Vec::new())));
        let (failure, _) = watch::channel(None);
        let failure = Arc::new(failure);

        let batcher = Batcher::new({
            let root = root.clone();
            let projects = Arc::clone(&projects);
            let failure = Arc::clone(&failure);
            move || {
                let root = root.clone();
                let projects = Arc::clone(&projects);
                let failure = Arc::clone(&failure);
                async move {
                    match scan_with_retry(&root, attempts, backoff).await {
                        Ok(scanned) => {
                            tracing::info!(
                                "registered {} projects from {}",
                                scanned.len(),
                                root.display()
                            );
                            *projects.write().await = Arc::new(scanned);
                            failure.send_replace(None);
                        }
                        Err(e) => {
                            tracing::error!(
                                "giving up scanning projects in {}: {}",
                                root.display(),
                                e
                            );
                            failure.send_replace(Some(e.to_string()));
                        }
                    }
                }
            }
        });

        Self {
            root,
            projects,
            batcher,
            failure,
        }
    }

    /// Returns the scanned directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rescans the root, or waits for the scan already in flight, and returns the new snapshot.
    ///
    /// Fails with [`DockmateError::ProjectScanFailed`] if that scan gave up.
    pub async fn refresh(&self) -> DockmateResult<Arc<Vec<Project>>> {
        self.batcher.invoke().await;
        match self.failure() {
            Some(e) => Err(e),
            None => Ok(self.projects().await),
        }
    }

    /// Returns the error of the last scan if it gave up.
    pub fn failure(&self) -> Option<DockmateError> {
        self.failure
            .borrow()
            .clone()
            .map(|reason| self.scan_failed(reason))
    }

    /// Waits until a scan gives up and returns its error.
    pub async fn failed(&self) -> DockmateError {
        let mut failure = self.failure.subscribe();
        let reason = failure
            .wait_for(Option::is_some)
            .await
            .map(|reason| reason.clone().unwrap_or_default());

        match reason {
            Ok(reason) => self.scan_failed(reason),
            // The sender lives in `self`.
            Err(_) => std::future::pending().await,
        }
    }

    /// Returns the snapshot of the last completed scan.
    ///
    /// During a refresh this is the previous snapshot.
    pub async fn projects(&self) -> Arc<Vec<Project>> {
        Arc::clone(&*self.projects.read().await)
    }

    /// Returns the project named `name`.
    pub async fn project(&self, name: &str) -> DockmateResult<Project> {
        self.projects()
            .await
            .iter()
            .find(|project| project.name == name)
            .cloned()
            .ok_or_else(|| DockmateError::ProjectNotFound(name.to_string()))
    }

    /// Returns the number of completed scans.
    pub fn scans(&self) -> u64 {
        self.batcher.rounds()
    }

    fn scan_failed(&self, reason: String) -> DockmateError {
        DockmateError::ProjectScanFailed {
            root: self.root.clone(),
            reason,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Scans `root` for project files.
///
/// Files that cannot be read or parsed are skipped with a warning. Of two files with the same stem,
/// the first one in file name order wins. Fails if the directory itself cannot be walked.
pub fn scan(root: &Path) -> DockmateResult<Vec<Project>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("projects directory not found: {}", root.display()),
        )
        .into());
    }

    let mut projects: Vec<Project> = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_project_file(entry.path()) {
            continue;
        }

        let Some(name) = entry.path().file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let name = name.to_string();

        if projects.iter().any(|project| project.name == name) {
            tracing::warn!(
                "skipping {}: project {} is already registered",
                entry.path().display(),
                name
            );
            continue;
        }

        let config = match fs::read_to_string(entry.path())
            .map_err(DockmateError::from)
            .and_then(|contents| ManageConfig::from_yaml(&contents))
        {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("skipping project file {}: {}", entry.path().display(), e);
                continue;
            }
        };

        tracing::debug!("found project {} at {}", name, entry.path().display());
        projects.push(Project {
            name,
            path: entry.into_path(),
            config,
        });
    }

    Ok(projects)
}

/// Scans `root` up to `attempts` times, pausing for `backoff` after each failure, and returns the
/// last error if every attempt fails.
pub async fn scan_with_retry(
    root: &Path,
    attempts: usize,
    backoff: Duration,
) -> DockmateResult<Vec<Project>> {
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        let dir = root.to_path_buf();
        let result = tokio::task::spawn_blocking(move || scan(&dir))
            .await
            .map_err(DockmateError::custom)?;

        match result {
            Ok(projects) => return Ok(projects),
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    "failed to scan projects in {} (attempt {}/{}): {}",
                    root.display(),
                    attempt,
                    attempts,
                    e
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PROJECT_FILE_EXTENSIONS.contains(&ext))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
