//! `credit-synth` library crate.
//!
//! The binary (`creditgen`) is a thin wrapper around this library so that:
//!
//! - the synthesis pipeline is testable without spawning processes
//! - the stages are reusable from other drivers (notebooks, services, benches)
//! - I/O and presentation stay out of the core

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod synth;
