use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Canceled,
    Rescheduled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::Rescheduled => "rescheduled",
            AppointmentStatus::Completed => "completed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(AppointmentStatus::Pending),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "canceled" => Some(AppointmentStatus::Canceled),
            "rescheduled" => Some(AppointmentStatus::Rescheduled),
            "completed" => Some(AppointmentStatus::Completed),
            _ => None,
        }
    }

    /// No further transitions are expected once an appointment is canceled
    /// or completed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Canceled | AppointmentStatus::Completed
        )
    }
}
