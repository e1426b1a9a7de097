//! Size-based log rotation.
//!
//! A [`RotatingLog`] appends to a log file and rotates it when it grows past a maximum size:
//! 1. The current log file is renamed with an `.old` extension, replacing any previous backup
//! 2. A new empty log file is created under the original name
//! 3. Writing continues in the new file
//!
//! The writer is synchronous. It is meant to sit behind `tracing_appender::non_blocking`, which
//! moves the actual writes off the logging threads.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A log file that rotates itself when reaching a maximum size.
///
/// # Example
///
/// ```no_run
/// use std::io::Write;
///
/// use dockutils::RotatingLog;
///
/// let mut log = RotatingLog::new("dockmate.log", Some(1024 * 1024))?; // 1MB max size
/// writeln!(log, "hello")?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct RotatingLog {
    /// The current log file being written to
    file: File,

    /// Path to the current log file
    path: PathBuf,

    /// Maximum size in bytes before rotation
    max_size: u64,

    /// Current size of the log file
    current_size: u64,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RotatingLog {
    /// Default maximum log file size (10MB)
    pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

    /// Opens (or creates) the log file at `path` in append mode.
    ///
    /// `max_size` defaults to [`RotatingLog::DEFAULT_MAX_SIZE`].
    pub fn new(path: impl AsRef<Path>, max_size: Option<u64>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = open_append(&path)?;
        let current_size = file.metadata()?.len();

        Ok(Self {
            file,
            path,
            max_size: max_size.unwrap_or(Self::DEFAULT_MAX_SIZE),
            current_size,
        })
    }

    /// Returns the path of the current log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path rotated logs are moved to.
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("old")
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.sync_all()?;

        let backup_path = self.backup_path();
        if backup_path.exists() {
            fs::remove_file(&backup_path)?;
        }

        fs::rename(&self.path, &backup_path)?;
        self.file = open_append(&self.path)?;
        self.current_size = 0;

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Write for RotatingLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;

        // An empty file is never rotated, so one oversized record still lands somewhere.
        if self.current_size > 0 && self.current_size + len > self.max_size {
            if let Err(e) = self.rotate() {
                eprintln!("Failed to rotate log file {}: {}", self.path.display(), e);
            }
        }

        let written = self.file.write(buf)?;
        self.current_size += written as u64;

        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
