use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::{collections, Document, DocumentStore, Filter, InsertResult, UpdateResult};
use shared_utils::access::{is_admin, AdminUser, ADMIN_ROLE};
use shared_utils::state::AppState;
use shared_utils::validation::require_string;

use crate::models::UserError;

pub struct UserService {
    config: Arc<AppConfig>,
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            store: state.store.clone(),
        }
    }

    /// Stores the user document as given. Repeated emails are not rejected.
    pub async fn create_user(&self, user: Document) -> Result<InsertResult, UserError> {
        let email = require_string(&user, "email")?.to_string();
        debug!("Creating user {}", email);

        let result = self.store.insert_one(collections::USERS, user).await?;
        info!("User {} stored as {}", email, result.inserted_id);

        Ok(result)
    }

    pub async fn list_users(&self) -> Result<Vec<Document>, UserError> {
        Ok(self.store.find(collections::USERS, &Filter::new()).await?)
    }

    pub async fn is_admin(&self, email: &str) -> Result<bool, UserError> {
        Ok(is_admin(self.store.as_ref(), email).await?)
    }

    /// Sets role "admin" on the user with `id`. Whether an unknown id creates a
    /// record follows `promotion_upsert`.
    pub async fn promote_to_admin(&self, id: &str, admin: &AdminUser) -> Result<UpdateResult, UserError> {
        debug!("{} promoting user {}", admin.email, id);

        let mut set = Document::new();
        set.insert("role".to_string(), Value::String(ADMIN_ROLE.to_string()));

        let upsert = self.config.promotion_upsert;
        let result = self.store.update_by_id(collections::USERS, id, set, upsert).await?;

        if result.upserted_id.is_some() {
            warn!("Promotion of unknown user {} created a record holding only the role", id);
        } else if result.matched_count == 0 {
            return Err(UserError::NotFound(id.to_string()));
        } else {
            info!("User {} promoted to admin by {}", id, admin.email);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;
    use shared_utils::test_utils::{TestConfig, TestUser};

    use super::*;

    fn admin() -> AdminUser {
        AdminUser { email: "admin@example.com".to_string() }
    }

    #[tokio::test]
    async fn promotion_sets_role_and_keeps_other_fields() {
        let (state, store) = TestConfig::default().to_state();
        let user = TestUser::patient("p@example.com");
        store.insert_one(collections::USERS, user.to_document()).await.unwrap();

        let result = UserService::new(&state).promote_to_admin(&user.id, &admin()).await.unwrap();
        assert_eq!(result.matched_count, 1);

        let stored = store.find_by_id(collections::USERS, &user.id).await.unwrap().unwrap();
        assert_eq!(stored["role"], "admin");
        assert_eq!(stored["email"], "p@example.com");
        assert_eq!(stored["name"], "Test User");
    }

    #[tokio::test]
    async fn promotion_of_unknown_id_upserts_by_default() {
        let (state, store) = TestConfig::default().to_state();

        let result = UserService::new(&state).promote_to_admin("ghost", &admin()).await.unwrap();
        assert_eq!(result.upserted_id.as_deref(), Some("ghost"));

        let created = store.find_by_id(collections::USERS, "ghost").await.unwrap().unwrap();
        assert_eq!(created["role"], "admin");
        assert!(created.get("email").is_none());
    }

    #[tokio::test]
    async fn promotion_of_unknown_id_is_not_found_when_upsert_disabled() {
        let config = TestConfig {
            promotion_upsert: false,
            ..TestConfig::default()
        };
        let (state, store) = config.to_state();

        let result = UserService::new(&state).promote_to_admin("ghost", &admin()).await;
        assert_matches!(result, Err(UserError::NotFound(ref id)) if id == "ghost");
        assert!(store.find(collections::USERS, &Filter::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_emails_are_stored_twice() {
        let (state, _store) = TestConfig::default().to_state();
        let service = UserService::new(&state);

        for _ in 0..2 {
            let user = json!({"name": "Jane", "email": "jane@example.com"}).as_object().cloned().unwrap();
            service.create_user(user).await.unwrap();
        }

        assert_eq!(service.list_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn user_without_email_is_rejected() {
        let (state, _store) = TestConfig::default().to_state();

        let user = json!({"name": "Jane"}).as_object().cloned().unwrap();
        let result = UserService::new(&state).create_user(user).await;
        assert_matches!(result, Err(UserError::Validation(_)));
    }
}
