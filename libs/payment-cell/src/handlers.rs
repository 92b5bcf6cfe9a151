use std::sync::Arc;

use axum::{extract::State, Json};

use shared_database::{Document, InsertResult};
use shared_models::auth::AuthenticatedUser;
use shared_models::error::AppError;

use crate::models::{PaymentIntentRequest, PaymentIntentResponse};
use crate::router::PaymentState;
use crate::services::PaymentService;

fn service(state: &PaymentState) -> PaymentService {
    PaymentService::new(
        Arc::clone(&state.gateway),
        Arc::clone(&state.app.store),
        &state.app.config.payment_currency,
    )
}

#[axum::debug_handler]
pub async fn create_payment_intent(
    State(state): State<PaymentState>,
    Json(request): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    let response = service(&state).create_intent(&request.price).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn record_payment(
    State(state): State<PaymentState>,
    user: AuthenticatedUser,
    Json(payment): Json<Document>,
) -> Result<Json<InsertResult>, AppError> {
    let result = service(&state).record_payment(payment, &user).await?;
    Ok(Json(result))
}
