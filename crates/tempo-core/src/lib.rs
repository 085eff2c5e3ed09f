//! Core types, configuration, and error handling for the Tempo engine.
//!
//! This crate provides the shared foundation used by all other Tempo crates:
//! - [`TempoError`] — unified error type using `thiserror`
//! - [`TempoConfig`] — configuration loaded from `.tempo.toml`
//! - Shared types: [`Period`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{GitConfig, StatusConfig, TempoConfig, TrackerConfig};
pub use error::TempoError;
pub use types::{OutputFormat, Period};

/// A convenience `Result` type for Tempo operations.
pub type Result<T> = std::result::Result<T, TempoError>;
