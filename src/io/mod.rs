//! Input/output helpers.
//!
//! - population CSV export (`export`)
//! - config JSON read/write (`config_file`)

pub mod config_file;
pub mod export;

pub use config_file::*;
pub use export::*;
