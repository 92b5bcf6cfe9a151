use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use shared_utils::extractor::auth_middleware;
use shared_utils::state::AppState;

use crate::handlers;
use crate::services::PaymentGateway;

#[derive(Clone)]
pub struct PaymentState {
    pub app: AppState,
    pub gateway: Arc<dyn PaymentGateway>,
}

pub fn payment_routes(state: AppState, gateway: Arc<dyn PaymentGateway>) -> Router {
    let payment_state = PaymentState {
        app: state.clone(),
        gateway,
    };

    let public_routes = Router::new()
        .route("/create-payment-intent", post(handlers::create_payment_intent));

    let protected_routes = Router::new()
        .route("/payments", post(handlers::record_payment))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(payment_state)
}
