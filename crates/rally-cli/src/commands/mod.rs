//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod play;
pub mod rate;
pub mod replay;
pub mod show;
pub mod validate;
