pub mod router;

use std::sync::Arc;

use tracing::info;

use shared_config::AppConfig;
use shared_database::{DocumentStore, MemoryStore, SupabaseClient};

/// Picks the hosted store when a database URL is configured, otherwise an
/// empty in-memory store.
pub fn build_store(config: &AppConfig) -> Arc<dyn DocumentStore> {
    if config.is_database_configured() {
        info!("Using hosted document store at {}", config.database_url);
        Arc::new(SupabaseClient::new(config))
    } else {
        info!("Using in-memory document store");
        Arc::new(MemoryStore::new())
    }
}
