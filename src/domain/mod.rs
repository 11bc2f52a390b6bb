//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - category enums (`Region`, `EducationLevel`, `EmploymentStatus`, `Housing`, ...)
//! - the synthesized record (`Applicant`) and its driver-assigned identity (`CustomerRecord`)
//! - the named parameter set for every stage (`SynthConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
