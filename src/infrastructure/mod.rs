//! Infrastructure layer.
//!
//! Configuration loading and the composition root. No business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Builds the service from configuration
//! - [`config`] - Configuration loading and validation

pub mod bootstrap;
pub mod config;
