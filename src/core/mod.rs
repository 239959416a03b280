//! Core domain models for release runs
//!
//! This module defines the configuration, the steps of a release and the
//! state a run reports back.

pub mod config;
pub mod error;
pub mod state;
pub mod step;
pub mod version;

pub use config::{ReleaseConfig, ReleaseFlags, ReleaseMode, ReleaseSettings, RegistrySecret};
pub use error::ReleaseError;
pub use state::*;
pub use step::*;
