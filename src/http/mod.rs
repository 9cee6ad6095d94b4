//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from specific
//! business logic.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{build_304_response, build_404_response, json_response};
