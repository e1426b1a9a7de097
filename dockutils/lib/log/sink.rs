use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::{DockutilsError, DockutilsResult, RotatingLog};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The destination of a process' log output.
///
/// A sink is opened once at process start, installed as the global `tracing` subscriber's writer,
/// and closed at shutdown. Closing (or dropping) the sink flushes every buffered record.
///
/// # Example
///
/// ```no_run
/// use dockutils::LogSink;
///
/// let sink = LogSink::open("dockmate.log", None)?;
/// sink.install("info")?;
///
/// tracing::info!("server started");
///
/// sink.close();
/// # Ok::<(), dockutils::DockutilsError>(())
/// ```
pub struct LogSink {
    /// The writer handed to the subscriber.
    writer: NonBlocking,

    /// Flushes the background writer when dropped.
    guard: WorkerGuard,

    /// Whether ANSI colors should be emitted.
    ansi: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl LogSink {
    /// Opens a sink that appends to a size-rotated log file at `path`.
    pub fn open(path: impl AsRef<Path>, max_size: Option<u64>) -> DockutilsResult<Self> {
        let log = RotatingLog::new(path, max_size)?;
        let (writer, guard) = tracing_appender::non_blocking(log);

        Ok(Self {
            writer,
            guard,
            ansi: false,
        })
    }

    /// Opens a sink that writes to stdout.
    pub fn stdout() -> Self {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        Self {
            writer,
            guard,
            ansi: true,
        }
    }

    /// Returns a writer that feeds this sink.
    pub fn writer(&self) -> NonBlocking {
        self.writer.clone()
    }

    /// Installs this sink as the writer of the global `tracing` subscriber.
    ///
    /// `default_directive` (e.g. `"info"` or `"dockmate=debug"`) is used unless `RUST_LOG` is set.
    pub fn install(&self, default_directive: &str) -> DockutilsResult<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(self.writer.clone())
            .with_ansi(self.ansi)
            .try_init()
            .map_err(|e| DockutilsError::SubscriberInit(e.to_string()))
    }

    /// Closes the sink, flushing all pending records.
    pub fn close(self) {
        drop(self.guard);
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
