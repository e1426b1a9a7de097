//! `dockutils` is a library containing general utilities for the dockmate project.
//!
//! It currently provides:
//! - [`Batcher`], a call collapser that lets concurrent callers share one execution of an
//!   expensive action.
//! - [`LogSink`], an explicitly opened and closed logging sink backing the `tracing` subscriber.
//! - [`term`], terminal detection for colored CLI output.

#![warn(missing_docs)]

pub mod batcher;
pub mod error;
pub mod log;
pub mod term;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use batcher::*;
pub use error::*;
pub use log::*;
