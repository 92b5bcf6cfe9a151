pub mod payment;
pub mod stripe;

pub use payment::PaymentService;
pub use stripe::{PaymentGateway, StripeClient};
