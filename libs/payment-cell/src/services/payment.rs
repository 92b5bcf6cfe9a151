// libs/payment-cell/src/services/payment.rs
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use shared_database::{collections, Document, DocumentStore, InsertResult};
use shared_models::auth::AuthenticatedUser;
use shared_utils::validation::{require_positive_amount, require_string};

use crate::models::{to_minor_units, PaymentError, PaymentIntentResponse};
use crate::services::stripe::PaymentGateway;

pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    store: Arc<dyn DocumentStore>,
    currency: String,
}

impl PaymentService {
    pub fn new(gateway: Arc<dyn PaymentGateway>, store: Arc<dyn DocumentStore>, currency: &str) -> Self {
        Self {
            gateway,
            store,
            currency: currency.to_string(),
        }
    }

    pub async fn create_intent(&self, price: &Value) -> Result<PaymentIntentResponse, PaymentError> {
        let price = require_positive_amount("price", price)?;
        let amount = to_minor_units(price);
        debug!("Payment intent requested for {} ({} minor units)", price, amount);

        let intent = self.gateway.create_payment_intent(amount, &self.currency).await?;

        Ok(PaymentIntentResponse {
            client_secret: intent.client_secret,
        })
    }

    /// Stores a completed payment and marks the caller's booking as paid.
    /// The payment is written first, so a failed write leaves the booking unpaid.
    pub async fn record_payment(
        &self,
        mut payment: Document,
        caller: &AuthenticatedUser,
    ) -> Result<InsertResult, PaymentError> {
        let booking_id = require_string(&payment, "bookingId")?.to_string();
        let transaction_id = require_string(&payment, "transactionId")?.to_string();
        require_positive_amount("price", payment.get("price").unwrap_or(&Value::Null))?;

        let booking = self
            .store
            .find_by_id(collections::BOOKINGS, &booking_id)
            .await?
            .ok_or_else(|| {
                warn!("Payment {} references unknown booking {}", transaction_id, booking_id);
                PaymentError::BookingNotFound(booking_id.clone())
            })?;

        if booking.get("email").and_then(Value::as_str) != Some(caller.email.as_str()) {
            warn!("{} tried to pay for booking {} owned by someone else", caller.email, booking_id);
            return Err(PaymentError::Forbidden(booking_id));
        }

        payment.insert("email".to_string(), Value::String(caller.email.clone()));
        let result = self.store.insert_one(collections::PAYMENTS, payment).await?;

        let mut paid = Document::new();
        paid.insert("paid".to_string(), Value::Bool(true));
        paid.insert("transactionId".to_string(), Value::String(transaction_id.clone()));
        self.store
            .update_by_id(collections::BOOKINGS, &booking_id, paid, false)
            .await?;

        info!("Recorded payment {} for booking {}", transaction_id, booking_id);
        Ok(result)
    }
}
