//! Gantry CLI Library
//!
//! This library provides the core functionality for the Gantry CLI tool.
//!
//! # Public API
//!
//! The primary public API is the [`client::ApiClient`] which provides
//! programmatic access to a Gantry control plane. Configuration types are
//! also available via [`config::CliConfig`] and [`config::ConfigBuilder`].
//!
//! ```no_run
//! use gantryctl::client::ApiClient;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = ApiClient::with_config(
//!     "https://gantry.example.com",
//!     10,  // timeout in seconds
//!     3,   // max retries
//!     Duration::from_millis(500),  // initial retry delay
//!     None,  // no stored session token
//! )?;
//!
//! let catalog = client.list_instances().await?;
//! for entry in &catalog {
//!     println!("{}: {} instances", entry.service, entry.instances.len());
//! }
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for communicating with the Gantry control plane.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

/// On-disk session token storage.
pub mod credentials;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Interactive confirmation and password prompts.
pub mod prompt;

#[cfg(test)]
pub mod test_utils;
