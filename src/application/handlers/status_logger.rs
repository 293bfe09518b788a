use crate::{application::services::event_bus::StatusChangeObserver, domain::events::StatusTransition};

/// Records every status transition in the application log.
#[derive(Debug, Default)]
pub struct StatusLogObserver;

impl StatusChangeObserver for StatusLogObserver {
    fn name(&self) -> &'static str {
        "status_log"
    }

    fn on_status_changed(&self, transition: &StatusTransition) -> anyhow::Result<()> {
        if transition.previous == transition.current {
            tracing::debug!(
                appointment_id = %transition.appointment_id,
                status = transition.current.as_str(),
                "Appointment status unchanged"
            );
            return Ok(());
        }
        if transition.previous.is_terminal() {
            tracing::warn!(
                appointment_id = %transition.appointment_id,
                previous = transition.previous.as_str(),
                current = transition.current.as_str(),
                "Appointment left a terminal status"
            );
        }
        tracing::info!(
            appointment_id = %transition.appointment_id,
            customer_id = %transition.customer_id,
            shop_id = %transition.shop_id,
            previous = transition.previous.as_str(),
            current = transition.current.as_str(),
            "Appointment status changed"
        );
        Ok(())
    }
}
