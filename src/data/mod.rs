//! Collaborators that sit outside the synthesis core.

pub mod names;

pub use names::*;
