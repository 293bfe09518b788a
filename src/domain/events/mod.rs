use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{errors::DomainError, models::AppointmentStatus};

/// Fields every lifecycle event carries. Built through [`AppointmentDetails::new`]
/// so that a listener never receives an event without a destination phone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentDetails {
    pub appointment_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub service_name: String,
    pub shop_name: String,
}

impl AppointmentDetails {
    pub fn new(
        appointment_id: Uuid,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        service_name: impl Into<String>,
        shop_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let details = Self {
            appointment_id,
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            service_name: service_name.into(),
            shop_name: shop_name.into(),
        };
        details.validate()?;
        Ok(details)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("customer_name", &self.customer_name),
            ("customer_phone", &self.customer_phone),
            ("service_name", &self.service_name),
            ("shop_name", &self.shop_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::Validation(format!("{field} must not be blank")));
            }
        }
        if !self.customer_phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(DomainError::Validation(
                "customer_phone must contain digits".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleEvent {
    Created {
        details: AppointmentDetails,
        scheduled_at: NaiveDateTime,
    },
    Confirmed {
        details: AppointmentDetails,
        scheduled_at: NaiveDateTime,
    },
    Canceled {
        details: AppointmentDetails,
        scheduled_at: NaiveDateTime,
        reason: Option<String>,
    },
    Rescheduled {
        details: AppointmentDetails,
        previous_at: NaiveDateTime,
        scheduled_at: NaiveDateTime,
    },
}

impl LifecycleEvent {
    pub fn details(&self) -> &AppointmentDetails {
        match self {
            LifecycleEvent::Created { details, .. }
            | LifecycleEvent::Confirmed { details, .. }
            | LifecycleEvent::Canceled { details, .. }
            | LifecycleEvent::Rescheduled { details, .. } => details,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleEvent::Created { .. } => "created",
            LifecycleEvent::Confirmed { .. } => "confirmed",
            LifecycleEvent::Canceled { .. } => "canceled",
            LifecycleEvent::Rescheduled { .. } => "rescheduled",
        }
    }

    /// Status the appointment holds once this event has happened.
    pub fn status(&self) -> AppointmentStatus {
        match self {
            LifecycleEvent::Created { .. } => AppointmentStatus::Pending,
            LifecycleEvent::Confirmed { .. } => AppointmentStatus::Confirmed,
            LifecycleEvent::Canceled { .. } => AppointmentStatus::Canceled,
            LifecycleEvent::Rescheduled { .. } => AppointmentStatus::Rescheduled,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusTransition {
    pub appointment_id: Uuid,
    pub previous: AppointmentStatus,
    pub current: AppointmentStatus,
    pub customer_id: Uuid,
    pub shop_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_reject_blank_phone() {
        let err = AppointmentDetails::new(Uuid::new_v4(), "João", "  ", "Corte", "Barbearia")
            .unwrap_err();
        assert!(err.to_string().contains("customer_phone"));
    }

    #[test]
    fn details_reject_phone_without_digits() {
        assert!(
            AppointmentDetails::new(Uuid::new_v4(), "João", "n/a", "Corte", "Barbearia").is_err()
        );
    }

    #[test]
    fn event_reports_kind_and_status() {
        let details =
            AppointmentDetails::new(Uuid::new_v4(), "João", "+5511999999999", "Corte", "Barbearia")
                .unwrap();
        let at = chrono::NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let event = LifecycleEvent::Canceled {
            details: details.clone(),
            scheduled_at: at,
            reason: None,
        };
        assert_eq!(event.kind(), "canceled");
        assert_eq!(event.status(), AppointmentStatus::Canceled);
        assert_eq!(event.details(), &details);
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let details =
            AppointmentDetails::new(Uuid::nil(), "João", "+5511999999999", "Corte", "Barbearia")
                .unwrap();
        let at = chrono::NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let event = LifecycleEvent::Rescheduled {
            details,
            previous_at: at,
            scheduled_at: at + chrono::Duration::days(1),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "rescheduled");
        assert_eq!(json["details"]["customer_phone"], "+5511999999999");
        assert_eq!(json["scheduled_at"], "2025-03-11T14:30:00");

        let back: LifecycleEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
