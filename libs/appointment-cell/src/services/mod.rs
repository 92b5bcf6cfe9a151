pub mod availability;
pub mod booking;

pub use availability::AvailabilityService;
pub use booking::BookingService;
