//! Oracle Common - shared configuration, errors and logging for the
//! Oracle Bíblico presentation layer.
//!
//! This crate provides:
//! - Configuration types and loading
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup and request trace context

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::{Config, NarrationConfig, NarrationProvider, NetworkConfig, ObservabilityConfig};
pub use error::{Error, Result};
pub use validation::{Validate, ValidationError, ValidationResult};
