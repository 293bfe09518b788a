pub mod appointment;
pub mod message;

pub use appointment::AppointmentStatus;
pub use message::{AttemptOutcome, DeliveryAttempt, SendOutcome, SkipReason};
