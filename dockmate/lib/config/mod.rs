//! Configuration types: mappings, run options and stored manage configurations.

mod env_file;
mod manage_config;
mod mapping;
mod run_options;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use env_file::*;
pub use manage_config::*;
pub use mapping::*;
pub use run_options::*;
