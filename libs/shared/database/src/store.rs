use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

/// A stored record. Every document carries its identifier under [`ID_FIELD`].
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

pub mod collections {
    pub const APPOINTMENT_OPTIONS: &str = "servicesOptions";
    pub const BOOKINGS: &str = "bookings";
    pub const USERS: &str = "users";
    pub const DOCTORS: &str = "doctors";
    pub const PAYMENTS: &str = "payments";
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document {id} already exists in {collection}")]
    DuplicateId { collection: String, id: String },

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Malformed document: {0}")]
    Malformed(String),
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Database(err.to_string())
    }
}

/// Conjunction of field equality conditions. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::new().eq(ID_FIELD, id)
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((field.to_string(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// A `null` condition also matches documents that lack the field.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|(field, expected)| {
            match (document.get(field), expected) {
                (None, Value::Null) => true,
                (Some(actual), expected) => actual == expected,
                (None, _) => false,
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(InsertResult),
    Duplicate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.find_one(collection, &Filter::by_id(id)).await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertResult, StoreError>;

    /// Inserts `document` only when no document matches `key`, as a single write.
    async fn insert_if_absent(
        &self,
        collection: &str,
        key: &Filter,
        document: Document,
    ) -> Result<InsertOutcome, StoreError>;

    /// Sets the given fields on one document. With `upsert`, a missing id is
    /// created holding only `_id` and the set fields.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, StoreError>;

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<DeleteResult, StoreError>;
}

/// Returns the document id, generating one when absent.
pub fn ensure_id(document: &mut Document) -> Result<String, StoreError> {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        None | Some(Value::Null) => {
            let id = Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(id)
        }
        Some(other) => Err(StoreError::Malformed(format!("{} must be a string, got {}", ID_FIELD, other))),
    }
}
