// libs/appointment-cell/src/services/availability.rs
use std::collections::HashSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use shared_database::{collections, Document, DocumentStore, Filter, ID_FIELD};
use shared_utils::state::AppState;

use crate::models::{AppointmentOption, Booking, BookingError, Specialty};

pub struct AvailabilityService {
    store: Arc<dyn DocumentStore>,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Every appointment option with its slots narrowed to those still free on `date`.
    /// Without a date only bookings lacking a date are subtracted.
    pub async fn available_options(&self, date: Option<&str>) -> Result<Vec<AppointmentOption>, BookingError> {
        debug!("Computing availability for date {:?}", date);

        let options = self.all_options().await?;

        let date_value = date.map(|d| Value::String(d.to_string())).unwrap_or(Value::Null);
        let bookings: Vec<Booking> = self
            .store
            .find(collections::BOOKINGS, &Filter::new().eq("appointmentDate", date_value))
            .await?
            .into_iter()
            .filter_map(|document| readable(collections::BOOKINGS, document))
            .collect();

        let options = subtract_booked_slots(options, &bookings);
        for option in &options {
            debug!("{:?} {} {}", date, option.name, option.slots.len());
        }

        Ok(options)
    }

    pub async fn specialties(&self) -> Result<Vec<Specialty>, BookingError> {
        Ok(self.all_options().await?.into_iter().map(Specialty::from).collect())
    }

    async fn all_options(&self) -> Result<Vec<AppointmentOption>, BookingError> {
        Ok(self
            .store
            .find(collections::APPOINTMENT_OPTIONS, &Filter::new())
            .await?
            .into_iter()
            .filter_map(|document| readable(collections::APPOINTMENT_OPTIONS, document))
            .collect())
    }
}

/// Records that don't fit the expected shape are left out of the computation.
fn readable<T: DeserializeOwned>(collection: &str, document: Document) -> Option<T> {
    let id = document.get(ID_FIELD).cloned().unwrap_or(Value::Null);
    match serde_json::from_value(Value::Object(document)) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Skipping unreadable record {} in {}: {}", id, collection, e);
            None
        }
    }
}

/// Removes from each option the slots taken by bookings for the same treatment,
/// keeping the remaining slots in their configured order. Callers pass bookings
/// already restricted to one date.
pub fn subtract_booked_slots(options: Vec<AppointmentOption>, bookings: &[Booking]) -> Vec<AppointmentOption> {
    options
        .into_iter()
        .map(|mut option| {
            let booked: HashSet<&str> = bookings
                .iter()
                .filter(|booking| booking.treatment_name.as_deref() == Some(option.name.as_str()))
                .filter_map(|booking| booking.slot.as_deref())
                .collect();

            option.slots.retain(|slot| !booked.contains(slot.as_str()));
            option
        })
        .collect()
}
