use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{collections, DeleteResult, Document, DocumentStore, Filter, InsertResult};
use shared_utils::access::AdminUser;
use shared_utils::state::AppState;
use shared_utils::validation::require_string;

use crate::models::DoctorError;

/// Doctor directory. Every operation takes an [`AdminUser`], so callers must
/// have passed the admin gate.
pub struct DoctorService {
    store: Arc<dyn DocumentStore>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Records are returned as stored; only creation checks their shape.
    pub async fn list_doctors(&self, admin: &AdminUser) -> Result<Vec<Document>, DoctorError> {
        debug!("{} listing doctors", admin.email);

        Ok(self.store.find(collections::DOCTORS, &Filter::new()).await?)
    }

    pub async fn create_doctor(&self, doctor: Document, admin: &AdminUser) -> Result<InsertResult, DoctorError> {
        let name = require_string(&doctor, "name")?.to_string();
        require_string(&doctor, "specialty")?;

        let result = self.store.insert_one(collections::DOCTORS, doctor).await?;
        info!("{} added doctor {} as {}", admin.email, name, result.inserted_id);

        Ok(result)
    }

    /// Deleting an unknown id reports `deletedCount: 0` rather than failing.
    pub async fn delete_doctor(&self, id: &str, admin: &AdminUser) -> Result<DeleteResult, DoctorError> {
        let result = self.store.delete_by_id(collections::DOCTORS, id).await?;
        info!("{} deleted doctor {} ({} removed)", admin.email, id, result.deleted_count);

        Ok(result)
    }
}
