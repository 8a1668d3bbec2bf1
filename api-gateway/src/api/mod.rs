//! API handlers
//!
//! This module contains all the API endpoint handlers organized by resource.
//! Each handler follows a consistent pattern:
//! - Extract state and parameters using Axum extractors
//! - Call the controller or service
//! - Map the result to a standardized response format

pub mod convert;
pub mod market;
pub mod response;
pub mod settings;
pub mod system;

pub use response::{ApiListResponse, ApiResponse, ResponseMetadata};
