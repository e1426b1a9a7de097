//! Keeping a configured container on the requested image version.

mod decision;
mod manager;
mod names;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use decision::*;
pub use manager::*;
pub use names::*;
