use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{Document, MemoryStore};
use shared_models::auth::Claims;

use crate::state::AppState;

pub struct TestConfig {
    pub access_token_secret: String,
    pub stripe_base_url: String,
    pub promotion_upsert: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            access_token_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            stripe_base_url: "http://localhost:12111/v1".to_string(),
            promotion_upsert: true,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            access_token_secret: self.access_token_secret.clone(),
            stripe_secret_key: "sk_test_fixture".to_string(),
            stripe_base_url: self.stripe_base_url.clone(),
            promotion_upsert: self.promotion_upsert,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// State over a fresh in-memory store; the store handle is returned for seeding.
    pub fn to_state(&self) -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (AppState::new(self.to_arc(), store.clone()), store)
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: Option<String>,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: None,
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.map(str::to_string),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, None)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Some("admin"))
    }

    pub fn to_document(&self) -> Document {
        let mut document = json!({
            "_id": self.id,
            "name": "Test User",
            "email": self.email,
        });
        if let Some(role) = &self.role {
            document["role"] = Value::String(role.clone());
        }
        document.as_object().cloned().unwrap_or_default()
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(email: &str, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let claims = Claims {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(exp_hours.unwrap_or(24))).timestamp(),
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .unwrap_or_default()
    }

    pub fn create_expired_token(email: &str, secret: &str) -> String {
        Self::create_test_token(email, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(email: &str) -> String {
        Self::create_test_token(email, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

/// Treatments as the clinic seeds them.
pub fn appointment_option_fixtures() -> Vec<Document> {
    vec![
        json!({
            "_id": "opt-teeth-orthodontics",
            "name": "Teeth Orthodontics",
            "price": 65,
            "slots": ["08.00 AM - 08.30 AM", "08.30 AM - 09.00 AM", "09.00 AM - 09.30 AM", "09.30 AM - 10.00 AM"]
        }),
        json!({
            "_id": "opt-cosmetic-dentistry",
            "name": "Cosmetic Dentistry",
            "price": 95,
            "slots": ["10.05 AM - 10.30 AM", "10.30 AM - 11.00 AM", "11.05 AM - 11.30 AM"]
        }),
        json!({
            "_id": "opt-teeth-cleaning",
            "name": "Teeth Cleaning",
            "price": 45,
            "slots": ["01.00 PM - 01.30 PM", "01.30 PM - 02.00 PM"]
        }),
    ]
    .into_iter()
    .filter_map(|value| value.as_object().cloned())
    .collect()
}
