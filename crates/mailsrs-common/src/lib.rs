//! MailSRS Common - Shared types and utilities
//!
//! This crate provides configuration, error types and address types
//! shared across all MailSRS components.

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, LoggingConfig, SrsConfig};
pub use error::{Error, FormatError, Result};
pub use types::{EmailAddress, Separator};
