// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_database::{collections, Document, DocumentStore, Filter, InsertOutcome};
use shared_models::auth::AuthenticatedUser;
use shared_utils::state::AppState;
use shared_utils::validation::{require_positive_amount, require_string};

use crate::models::{BookingError, BookingKey, BookingOutcome};

pub struct BookingService {
    store: Arc<dyn DocumentStore>,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Stores the booking unless the patient already holds one for the same
    /// date and treatment. The check and the insert are one conditional write.
    pub async fn create_booking(&self, booking: Document) -> Result<BookingOutcome, BookingError> {
        let key = validate_booking(&booking)?;
        debug!(
            "Booking {} for {} on {}",
            key.treatment_name, key.email, key.appointment_date
        );

        let filter = Filter::new()
            .eq("appointmentDate", key.appointment_date.as_str())
            .eq("email", key.email.as_str())
            .eq("treatmentName", key.treatment_name.as_str());

        match self.store.insert_if_absent(collections::BOOKINGS, &filter, booking).await? {
            InsertOutcome::Inserted(result) => {
                info!("Booking {} created for {}", result.inserted_id, key.email);
                Ok(BookingOutcome::Created(result))
            }
            InsertOutcome::Duplicate => {
                warn!(
                    "Duplicate booking refused for {} on {} ({})",
                    key.email, key.appointment_date, key.treatment_name
                );
                Ok(BookingOutcome::already_booked(&key.appointment_date))
            }
        }
    }

    /// A patient may only list their own bookings.
    pub async fn bookings_for_user(
        &self,
        email: Option<&str>,
        caller: &AuthenticatedUser,
    ) -> Result<Vec<Document>, BookingError> {
        let email = match email {
            Some(email) if email == caller.email => email,
            _ => {
                warn!("{} asked for bookings of {:?}", caller.email, email);
                return Err(BookingError::IdentityMismatch);
            }
        };

        Ok(self
            .store
            .find(collections::BOOKINGS, &Filter::new().eq("email", email))
            .await?)
    }

    pub async fn booking_by_id(&self, id: &str) -> Result<Option<Document>, BookingError> {
        Ok(self.store.find_by_id(collections::BOOKINGS, id).await?)
    }
}

pub fn validate_booking(booking: &Document) -> Result<BookingKey, BookingError> {
    let appointment_date = require_string(booking, "appointmentDate")?.to_string();
    let email = require_string(booking, "email")?.to_string();
    let treatment_name = require_string(booking, "treatmentName")?.to_string();
    require_string(booking, "slot")?;

    if let Some(price) = booking.get("price").filter(|price| !price.is_null()) {
        require_positive_amount("price", price)?;
    }

    Ok(BookingKey {
        appointment_date,
        email,
        treatment_name,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;
    use shared_utils::test_utils::TestConfig;

    use super::*;

    fn booking(date: &str, email: &str, treatment: &str, slot: &str) -> Document {
        json!({
            "appointmentDate": date,
            "email": email,
            "treatmentName": treatment,
            "slot": slot,
            "patient": "Jane Roe",
            "phone": "555-0100",
            "price": 65
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[tokio::test]
    async fn duplicate_booking_is_refused_and_not_stored() {
        let (state, store) = TestConfig::default().to_state();
        let service = BookingService::new(&state);

        let first = service
            .create_booking(booking("Nov 3, 2022", "p@example.com", "Teeth Cleaning", "a"))
            .await
            .unwrap();
        assert_matches!(first, BookingOutcome::Created(ref result) if result.acknowledged);

        // a different slot does not make it a different booking
        let second = service
            .create_booking(booking("Nov 3, 2022", "p@example.com", "Teeth Cleaning", "b"))
            .await
            .unwrap();
        assert_eq!(second, BookingOutcome::already_booked("Nov 3, 2022"));

        assert_eq!(store.find(collections::BOOKINGS, &Filter::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn same_patient_may_book_other_dates_and_treatments() {
        let (state, _store) = TestConfig::default().to_state();
        let service = BookingService::new(&state);

        for (date, treatment) in [("Nov 3, 2022", "Teeth Cleaning"), ("Nov 4, 2022", "Teeth Cleaning"), ("Nov 3, 2022", "Fluoride")] {
            let outcome = service
                .create_booking(booking(date, "p@example.com", treatment, "a"))
                .await
                .unwrap();
            assert_matches!(outcome, BookingOutcome::Created(_));
        }
    }

    #[tokio::test]
    async fn listing_someone_elses_bookings_is_forbidden() {
        let (state, _store) = TestConfig::default().to_state();
        let service = BookingService::new(&state);
        let caller = AuthenticatedUser { email: "p@example.com".to_string() };

        assert_matches!(
            service.bookings_for_user(Some("other@example.com"), &caller).await,
            Err(BookingError::IdentityMismatch)
        );
        assert_matches!(
            service.bookings_for_user(None, &caller).await,
            Err(BookingError::IdentityMismatch)
        );
        assert_matches!(service.bookings_for_user(Some("p@example.com"), &caller).await, Ok(ref list) if list.is_empty());
    }

    #[test]
    fn validation_rejects_missing_fields_and_bad_price() {
        let mut missing_slot = booking("Nov 3, 2022", "p@example.com", "Teeth Cleaning", "a");
        missing_slot.remove("slot");
        assert_matches!(validate_booking(&missing_slot), Err(BookingError::Validation(_)));

        let mut negative = booking("Nov 3, 2022", "p@example.com", "Teeth Cleaning", "a");
        negative.insert("price".to_string(), json!(-1));
        assert_matches!(validate_booking(&negative), Err(BookingError::Validation(_)));

        let blank_email = booking("Nov 3, 2022", " ", "Teeth Cleaning", "a");
        assert_matches!(validate_booking(&blank_email), Err(BookingError::Validation(_)));
    }
}
