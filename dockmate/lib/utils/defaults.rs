use std::time::Duration;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// How long a single Docker API call may take.
pub const DEFAULT_DOCKER_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a stopped container gets to exit before Docker kills it.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

/// The environment override file used when no mode-specific one exists.
pub const DEFAULT_ENV_FILENAME: &str = "env.list";

/// The directory scanned for project configurations.
pub const DEFAULT_PROJECTS_DIR: &str = "projects";

/// The address the server listens on.
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";

/// How often the server refreshes its project registry.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// How many times a failed project scan is attempted before giving up.
pub const DEFAULT_SCAN_ATTEMPTS: usize = 3;

/// The pause between failed project scan attempts.
pub const DEFAULT_SCAN_BACKOFF: Duration = Duration::from_secs(3);

/// The environment variable overriding [`DEFAULT_DOCKER_TIMEOUT`], in seconds.
pub const DOCKMATE_DOCKER_TIMEOUT_ENV_VAR: &str = "DOCKMATE_DOCKER_TIMEOUT";

/// The environment variable overriding [`DEFAULT_PROJECTS_DIR`].
pub const DOCKMATE_PROJECTS_DIR_ENV_VAR: &str = "DOCKMATE_PROJECTS_DIR";
