// libs/payment-cell/src/services/stripe.rs
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{PaymentError, PaymentIntent};

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Requests a card payment intent for `amount` minor units.
    async fn create_payment_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent, PaymentError>;
}

/// Stripe REST client for payment intents
/// Based on: https://docs.stripe.com/api/payment_intents/create
pub struct StripeClient {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            secret_key: config.stripe_secret_key.clone(),
            base_url: config.stripe_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.secret_key.is_empty() && !self.base_url.is_empty()
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    /// POST /v1/payment_intents
    async fn create_payment_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent, PaymentError> {
        if !self.is_configured() {
            return Err(PaymentError::NotConfigured);
        }

        let url = format!("{}/payment_intents", self.base_url);
        debug!("Creating payment intent for {} {} at {}", amount, currency, url);

        let form = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Payment intent creation failed: {} - {}", status, response_text);
            return Err(PaymentError::ProviderError {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        let intent: PaymentIntent = serde_json::from_str(&response_text).map_err(|e| PaymentError::ProviderError {
            message: format!("Failed to parse payment intent: {}", e),
        })?;

        info!("Created payment intent {}", intent.id);
        Ok(intent)
    }
}
