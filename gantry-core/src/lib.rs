//! Gantry Core Library
//!
//! Shared building blocks for the Gantry command-line client: the wire
//! models exchanged with the control plane, the common error type, and
//! the plain-text table renderer used for list output.

pub mod api;
pub mod error;
pub mod table;

pub use error::*;
pub use table::Table;
