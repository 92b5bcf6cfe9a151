use std::env;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 5;
pub const DEFAULT_STRIPE_BASE_URL: &str = "https://api.stripe.com/v1";
pub const DEFAULT_PAYMENT_CURRENCY: &str = "usd";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub access_token_secret: String,
    pub token_ttl_days: i64,
    pub database_url: String,
    pub database_api_key: String,
    pub stripe_secret_key: String,
    pub stripe_base_url: String,
    pub payment_currency: String,
    /// When set, promoting an unknown user id creates a record holding only the role.
    pub promotion_upsert: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            access_token_secret: String::new(),
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
            database_url: String::new(),
            database_api_key: String::new(),
            stripe_secret_key: String::new(),
            stripe_base_url: DEFAULT_STRIPE_BASE_URL.to_string(),
            payment_currency: DEFAULT_PAYMENT_CURRENCY.to_string(),
            promotion_upsert: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or_else(|| {
                    warn!("PORT not set or invalid, using {}", DEFAULT_PORT);
                    DEFAULT_PORT
                }),
            access_token_secret: env::var("ACCESS_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("ACCESS_TOKEN not set, every bearer token will be rejected");
                    String::new()
                }),
            token_ttl_days: env::var("TOKEN_TTL_DAYS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_DAYS),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, falling back to the in-memory store");
                    String::new()
                }),
            database_api_key: env::var("DATABASE_API_KEY")
                .unwrap_or_else(|_| String::new()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY")
                .unwrap_or_else(|_| {
                    warn!("STRIPE_SECRET_KEY not set, payment intents are unavailable");
                    String::new()
                }),
            stripe_base_url: env::var("STRIPE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_STRIPE_BASE_URL.to_string()),
            payment_currency: env::var("PAYMENT_CURRENCY")
                .unwrap_or_else(|_| DEFAULT_PAYMENT_CURRENCY.to_string()),
            promotion_upsert: env::var("ADMIN_PROMOTION_UPSERT")
                .map(|value| !matches!(value.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.access_token_secret.is_empty()
            && self.is_database_configured()
    }

    pub fn is_database_configured(&self) -> bool {
        !self.database_url.is_empty()
    }

    pub fn is_payment_configured(&self) -> bool {
        !self.stripe_secret_key.is_empty() && !self.stripe_base_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_memory_store_and_five_day_tokens() {
        let config = AppConfig::default();

        assert_eq!(config.port, 5000);
        assert_eq!(config.token_ttl_days, 5);
        assert!(!config.is_database_configured());
        assert!(!config.is_payment_configured());
        assert!(config.promotion_upsert);
    }

    #[test]
    fn payment_requires_secret_key() {
        let config = AppConfig {
            stripe_secret_key: "sk_test_123".to_string(),
            ..AppConfig::default()
        };

        assert!(config.is_payment_configured());
    }
}
