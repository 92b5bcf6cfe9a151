use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{
    ensure_id, DeleteResult, Document, DocumentStore, Filter, InsertOutcome, InsertResult,
    StoreError, UpdateResult, ID_FIELD,
};

/// Process-local store. Every write holds the collection map's write lock, so
/// conditional writes cannot interleave.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preloads documents into a collection, assigning ids where missing.
    pub async fn seed(&self, collection: &str, documents: Vec<Document>) -> Result<(), StoreError> {
        for document in documents {
            self.insert_one(collection, document).await?;
        }
        Ok(())
    }

    fn insert_locked(
        collections: &mut HashMap<String, Vec<Document>>,
        collection: &str,
        mut document: Document,
    ) -> Result<InsertResult, StoreError> {
        let id = ensure_id(&mut document)?;
        let documents = collections.entry(collection.to_string()).or_default();

        if documents.iter().any(|existing| existing.get(ID_FIELD) == Some(&Value::String(id.clone()))) {
            return Err(StoreError::DuplicateId {
                collection: collection.to_string(),
                id,
            });
        }

        documents.push(document);
        debug!("Inserted document {} into {}", id, collection);

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id,
        })
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;

        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| filter.matches(document))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertResult, StoreError> {
        let mut collections = self.collections.write().await;
        Self::insert_locked(&mut collections, collection, document)
    }

    async fn insert_if_absent(
        &self,
        collection: &str,
        key: &Filter,
        document: Document,
    ) -> Result<InsertOutcome, StoreError> {
        let mut collections = self.collections.write().await;

        let exists = collections
            .get(collection)
            .is_some_and(|documents| documents.iter().any(|existing| key.matches(existing)));
        if exists {
            return Ok(InsertOutcome::Duplicate);
        }

        Self::insert_locked(&mut collections, collection, document).map(InsertOutcome::Inserted)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let target = documents
            .iter_mut()
            .find(|document| document.get(ID_FIELD) == Some(&Value::String(id.to_string())));

        if let Some(document) = target {
            let mut modified = false;
            for (field, value) in set {
                if field == ID_FIELD {
                    continue;
                }
                if document.get(&field) != Some(&value) {
                    document.insert(field, value);
                    modified = true;
                }
            }

            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                ..UpdateResult::default()
            });
        }

        if !upsert {
            return Ok(UpdateResult {
                acknowledged: true,
                ..UpdateResult::default()
            });
        }

        let mut document = set;
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        documents.push(document);
        debug!("Upserted document {} into {}", id, collection);

        Ok(UpdateResult {
            acknowledged: true,
            upserted_count: 1,
            upserted_id: Some(id.to_string()),
            ..UpdateResult::default()
        })
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<DeleteResult, StoreError> {
        let mut collections = self.collections.write().await;

        let deleted_count = match collections.get_mut(collection) {
            Some(documents) => {
                let before = documents.len();
                documents.retain(|document| document.get(ID_FIELD) != Some(&Value::String(id.to_string())));
                (before - documents.len()) as u64
            }
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }
}
