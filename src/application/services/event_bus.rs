use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::domain::{
    errors::DomainError,
    events::{AppointmentDetails, LifecycleEvent, StatusTransition},
};

/// Coarse listener: receives only the ids and the two statuses.
pub trait StatusChangeObserver: Send + Sync {
    fn name(&self) -> &'static str;
    fn on_status_changed(&self, transition: &StatusTransition) -> anyhow::Result<()>;
}

/// Rich listener with one callback per lifecycle event kind.
pub trait AppointmentObserver: Send + Sync {
    fn name(&self) -> &'static str;

    fn on_created(
        &self,
        details: &AppointmentDetails,
        scheduled_at: &chrono::NaiveDateTime,
    ) -> anyhow::Result<()>;

    fn on_confirmed(
        &self,
        details: &AppointmentDetails,
        scheduled_at: &chrono::NaiveDateTime,
    ) -> anyhow::Result<()>;

    fn on_canceled(
        &self,
        details: &AppointmentDetails,
        scheduled_at: &chrono::NaiveDateTime,
        reason: Option<&str>,
    ) -> anyhow::Result<()>;

    fn on_rescheduled(
        &self,
        details: &AppointmentDetails,
        previous_at: &chrono::NaiveDateTime,
        scheduled_at: &chrono::NaiveDateTime,
    ) -> anyhow::Result<()>;
}

/// Fans lifecycle events out to registered observers, in registration
/// order, on the caller's thread. An observer that errors or panics is
/// logged and skipped.
#[derive(Clone, Default)]
pub struct LifecycleBroadcaster {
    status_observers: Vec<Arc<dyn StatusChangeObserver>>,
    appointment_observers: Vec<Arc<dyn AppointmentObserver>>,
}

impl LifecycleBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_status_observer(&mut self, observer: Arc<dyn StatusChangeObserver>) {
        self.status_observers.push(observer);
    }

    pub fn register_appointment_observer(&mut self, observer: Arc<dyn AppointmentObserver>) {
        self.appointment_observers.push(observer);
    }

    pub fn publish_transition(&self, transition: &StatusTransition) {
        for observer in &self.status_observers {
            isolate(observer.name(), "status_changed", || {
                observer.on_status_changed(transition)
            });
        }
    }

    /// Returns an error only when the event itself is incomplete; observer
    /// failures never reach the caller.
    pub fn publish(&self, event: &LifecycleEvent) -> Result<(), DomainError> {
        if let Err(err) = event.details().validate() {
            tracing::error!(
                appointment_id = %event.details().appointment_id,
                kind = event.kind(),
                status = event.status().as_str(),
                error = %err,
                "Refusing to broadcast incomplete lifecycle event"
            );
            return Err(err);
        }

        for observer in &self.appointment_observers {
            isolate(observer.name(), event.kind(), || match event {
                LifecycleEvent::Created {
                    details,
                    scheduled_at,
                } => observer.on_created(details, scheduled_at),
                LifecycleEvent::Confirmed {
                    details,
                    scheduled_at,
                } => observer.on_confirmed(details, scheduled_at),
                LifecycleEvent::Canceled {
                    details,
                    scheduled_at,
                    reason,
                } => observer.on_canceled(details, scheduled_at, reason.as_deref()),
                LifecycleEvent::Rescheduled {
                    details,
                    previous_at,
                    scheduled_at,
                } => observer.on_rescheduled(details, previous_at, scheduled_at),
            });
        }
        Ok(())
    }
}

fn isolate(observer: &str, event: &str, call: impl FnOnce() -> anyhow::Result<()>) {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            tracing::error!(observer, event, error = %err, "Observer failed");
        }
        Err(_) => {
            tracing::error!(observer, event, "Observer panicked");
        }
    }
}
