use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::{collections, DocumentStore, Filter};
use shared_models::error::AppError;
use shared_utils::jwt::issue_token;
use shared_utils::state::AppState;

pub struct TokenService {
    config: Arc<AppConfig>,
    store: Arc<dyn DocumentStore>,
}

impl TokenService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            store: state.store.clone(),
        }
    }

    /// Signs a token for `email` when a user record exists for it; `None` otherwise.
    /// The existence of the record is the only credential checked.
    pub async fn issue_for(&self, email: &str) -> Result<Option<String>, AppError> {
        debug!("Token requested for {}", email);

        let user = self
            .store
            .find_one(collections::USERS, &Filter::new().eq("email", email))
            .await?;

        if user.is_none() {
            warn!("Token refused, no user registered for {}", email);
            return Ok(None);
        }

        let token = issue_token(email, &self.config.access_token_secret, self.config.token_ttl_days)?;
        info!("Issued access token for {}", email);

        Ok(Some(token))
    }
}
