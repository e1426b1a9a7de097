use std::{
    error::Error,
    fmt::{self, Display},
    path::PathBuf,
    time::Duration,
};
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a dockmate-related operation.
pub type DockmateResult<T> = Result<T, DockmateError>;

/// An error that occurred while looking up, running or managing containers.
#[derive(pretty_error_debug::Debug, Error)]
pub enum DockmateError {
    /// No container matched the given id or name.
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// No image matched the given id, name or tag.
    #[error("image not found: {0}")]
    ImageNotFound(String),

    /// A container with the target name already runs the requested image.
    #[error("container already running: {0}")]
    ContainerAlreadyRunning(String),

    /// An id prefix matched more than one container or image.
    #[error("ambiguous id prefix {0}: matches {1:?}")]
    AmbiguousId(String, Vec<String>),

    /// No project with the given name is registered.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// The projects directory could not be scanned after all retries.
    #[error("giving up scanning projects in {root}: {reason}")]
    ProjectScanFailed {
        /// The scanned directory.
        root: PathBuf,

        /// The last scan error.
        reason: String,
    },

    /// The requested mode is not declared in the configuration.
    #[error("unknown mode {mode}: expected one of {modes:?}")]
    UnknownMode {
        /// The requested mode.
        mode: String,

        /// The declared modes.
        modes: Vec<String>,
    },

    /// A mapping could not be parsed.
    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    /// A port mapping's host side is not a valid port number.
    #[error("invalid port mapping: {0}")]
    InvalidPortMapping(String),

    /// A restart policy could not be parsed.
    #[error("invalid restart policy: {0}")]
    InvalidRestartPolicy(String),

    /// A Docker API call did not complete in time.
    #[error("docker {operation} timed out after {timeout:?}")]
    Timeout {
        /// The operation that timed out.
        operation: &'static str,

        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// An error returned by the Docker Engine API.
    #[error("docker error: {0}")]
    Docker(#[from] bollard::errors::Error),

    /// Replacing a container failed and restoring the old one failed too.
    #[error("{original} ({rollback})")]
    RollbackFailed {
        /// The error that triggered the rollback.
        original: Box<DockmateError>,

        /// The error the rollback itself failed with.
        rollback: Box<DockmateError>,
    },

    /// An I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred while (de)serializing YAML.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An error that occurred while (de)serializing JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error that occurred while reading an environment file.
    #[error("env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    /// An error that occurred while walking a directory.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// An error from the dockutils utilities.
    #[error("utils error: {0}")]
    Utils(#[from] dockutils::DockutilsError),

    /// An error that can represent any error.
    #[error(transparent)]
    Custom(#[from] AnyError),
}

/// An error that can represent any error.
#[derive(Debug)]
pub struct AnyError {
    error: anyhow::Error,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DockmateError {
    /// Creates a new `Err` result.
    pub fn custom(error: impl Into<anyhow::Error>) -> DockmateError {
        DockmateError::Custom(AnyError {
            error: error.into(),
        })
    }

    /// Returns `true` if the error reports a missing container, image or project.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DockmateError::ContainerNotFound(_)
                | DockmateError::ImageNotFound(_)
                | DockmateError::ProjectNotFound(_)
        )
    }
}

impl AnyError {
    /// Downcasts the error to a `T`.
    pub fn downcast<T>(&self) -> Option<&T>
    where
        T: Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref::<T>()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for AnyError {
    fn eq(&self, other: &Self) -> bool {
        self.error.to_string() == other.error.to_string()
    }
}

impl Display for AnyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Error for AnyError {}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
