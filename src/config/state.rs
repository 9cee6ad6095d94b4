// Application state module
// Immutable state shared by all connection tasks

use crate::handler::Router;

use super::types::Config;

/// Application state
///
/// Built once at startup and shared behind `Arc`. The route table is fixed
/// for the lifetime of the process, so no locking is required.
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            router: Router::new(),
        }
    }
}
