//! Common types and utilities for the crypto tracker
//!
//! This library contains shared types, utilities, and abstractions used across
//! all crates in the tracker workspace. It provides a unified approach to
//! error handling, display formatting, and domain models.

pub mod error;
pub mod model;
pub mod decimal;
pub mod format;

/// Re-export important types
pub use error::{Error, Result, ErrorExt, IntoError};
pub use decimal::*;

// Re-export utoipa for use in model ToSchema derives
#[cfg(feature = "utoipa")]
pub use utoipa;
