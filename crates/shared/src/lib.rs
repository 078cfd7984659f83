//! Shared types, errors, and configuration for Tresor.
//!
//! This crate provides common types used across all other crates:
//! - Currency classification for the dual-currency ledger (USD / CDF)
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
