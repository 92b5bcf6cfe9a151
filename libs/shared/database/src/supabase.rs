use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::store::{
    ensure_id, DeleteResult, Document, DocumentStore, Filter, InsertOutcome, InsertResult,
    StoreError, UpdateResult, ID_FIELD,
};

/// Document store backed by a PostgREST (Supabase) endpoint. Each collection
/// is a table; the key columns used by conditional inserts need a unique index.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.database_url.trim_end_matches('/').to_string(),
            api_key: config.database_api_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.api_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    fn table_path(collection: &str, filter: &Filter) -> String {
        let mut query = vec!["select=*".to_string()];
        query.extend(filter.conditions().iter().map(|(field, value)| {
            let field = urlencoding::encode(field);
            match value {
                Value::Null => format!("{}=is.null", field),
                Value::String(s) => format!("{}=eq.{}", field, urlencoding::encode(s)),
                other => format!("{}=eq.{}", field, urlencoding::encode(&other.to_string())),
            }
        }));

        format!("/rest/v1/{}?{}", collection, query.join("&"))
    }

    fn prefer(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static(value));
        headers
    }

    fn into_documents(rows: Vec<Value>) -> Result<Vec<Document>, StoreError> {
        rows.into_iter()
            .map(|row| match row {
                Value::Object(document) => Ok(document),
                other => Err(StoreError::Malformed(format!("expected an object row, got {}", other))),
            })
            .collect()
    }

    fn inserted_id(rows: &[Value]) -> Result<String, StoreError> {
        rows.first()
            .and_then(|row| row.get(ID_FIELD))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Malformed("insert returned no id".to_string()))
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DocumentStore for SupabaseClient {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<Value> = self
            .request(Method::GET, &Self::table_path(collection, filter), None)
            .await?;

        Self::into_documents(rows)
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<InsertResult, StoreError> {
        ensure_id(&mut document)?;

        let rows: Vec<Value> = self
            .request_with_headers(
                Method::POST,
                &format!("/rest/v1/{}", collection),
                Some(Value::Object(document)),
                Some(Self::prefer("return=representation")),
            )
            .await?;

        let inserted_id = Self::inserted_id(&rows)?;
        info!("Inserted {} into {}", inserted_id, collection);

        Ok(InsertResult {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn insert_if_absent(
        &self,
        collection: &str,
        key: &Filter,
        mut document: Document,
    ) -> Result<InsertOutcome, StoreError> {
        ensure_id(&mut document)?;

        let on_conflict = key
            .conditions()
            .iter()
            .map(|(field, _)| field.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let path = format!("/rest/v1/{}?on_conflict={}", collection, urlencoding::encode(&on_conflict));

        // The unique index makes the database drop the row instead of inserting a duplicate.
        let rows: Vec<Value> = self
            .request_with_headers(
                Method::POST,
                &path,
                Some(Value::Object(document)),
                Some(Self::prefer("return=representation,resolution=ignore-duplicates")),
            )
            .await?;

        if rows.is_empty() {
            return Ok(InsertOutcome::Duplicate);
        }

        Ok(InsertOutcome::Inserted(InsertResult {
            acknowledged: true,
            inserted_id: Self::inserted_id(&rows)?,
        }))
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, StoreError> {
        let patch_path = format!("/rest/v1/{}?{}=eq.{}", collection, ID_FIELD, urlencoding::encode(id));

        let rows: Vec<Value> = self
            .request_with_headers(
                Method::PATCH,
                &patch_path,
                Some(Value::Object(set.clone())),
                Some(Self::prefer("return=representation")),
            )
            .await?;

        if !rows.is_empty() {
            let matched = rows.len() as u64;
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: matched,
                modified_count: matched,
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

        let _: Vec<Value> = self
            .request_with_headers(
                Method::POST,
                &format!("/rest/v1/{}?on_conflict={}", collection, ID_FIELD),
                Some(Value::Object(document)),
                Some(Self::prefer("return=representation,resolution=merge-duplicates")),
            )
            .await?;

        Ok(UpdateResult {
            acknowledged: true,
            upserted_count: 1,
            upserted_id: Some(id.to_string()),
            ..UpdateResult::default()
        })
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<DeleteResult, StoreError> {
        let path = format!("/rest/v1/{}?{}=eq.{}", collection, ID_FIELD, urlencoding::encode(id));

        let rows: Vec<Value> = self
            .request_with_headers(Method::DELETE, &path, None, Some(Self::prefer("return=representation")))
            .await?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: rows.len() as u64,
        })
    }
}
