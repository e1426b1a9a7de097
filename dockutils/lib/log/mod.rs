//! Logging utilities.

mod rotating;
mod sink;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use rotating::*;
pub use sink::*;
