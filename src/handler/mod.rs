//! Request handler module
//!
//! Responsible for request routing dispatch and business logic processing.
//! The route table is fixed at startup; static asset serving acts as the
//! fallback for unmatched GET/HEAD requests.

pub mod router;
pub mod routes;
pub mod static_files;

// Re-export main entry point
pub use router::{handle_request, Router};
