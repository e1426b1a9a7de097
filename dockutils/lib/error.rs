//! `dockutils::error` is a module containing error utilities for the dockmate project.

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a dockutils-related operation.
pub type DockutilsResult<T> = Result<T, DockutilsError>;

/// An error that occurred while setting up logging.
#[derive(pretty_error_debug::Debug, Error)]
pub enum DockutilsError {
    /// The log file could not be opened
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// The global tracing subscriber could not be installed
    #[error("failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::LogSink;

    use super::*;

    #[test]
    fn test_log_sink_open_reports_io_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("blocker"), "")?;
        let path = dir.path().join("blocker").join("dockmate.log");

        let error = LogSink::open(&path, None).err();
        assert!(matches!(error, Some(DockutilsError::IoError(_))));

        Ok(())
    }
}
