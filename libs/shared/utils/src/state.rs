use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::DocumentStore;

/// Handles shared by every request: configuration and the document store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }
}
