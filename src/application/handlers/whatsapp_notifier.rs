use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{
    application::services::{event_bus::AppointmentObserver, messenger::MessagingGateway},
    domain::events::AppointmentDetails,
};

/// Turns appointment lifecycle events into WhatsApp messages for the
/// customer. Sends are handed to the gateway and not awaited.
pub struct WhatsAppNotifier {
    gateway: Arc<MessagingGateway>,
}

impl WhatsAppNotifier {
    pub fn new(gateway: Arc<MessagingGateway>) -> Self {
        Self { gateway }
    }

    fn dispatch(&self, details: &AppointmentDetails, kind: &'static str, body: String) {
        tracing::debug!(
            appointment_id = %details.appointment_id,
            kind,
            "Queueing WhatsApp notification"
        );
        // The outcome is logged by the gateway.
        let _ = self.gateway.send_whatsapp(&details.customer_phone, &body);
    }
}

impl AppointmentObserver for WhatsAppNotifier {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    fn on_created(
        &self,
        details: &AppointmentDetails,
        scheduled_at: &NaiveDateTime,
    ) -> anyhow::Result<()> {
        self.dispatch(details, "created", render_created(details, scheduled_at));
        Ok(())
    }

    fn on_confirmed(
        &self,
        details: &AppointmentDetails,
        scheduled_at: &NaiveDateTime,
    ) -> anyhow::Result<()> {
        self.dispatch(details, "confirmed", render_confirmed(details, scheduled_at));
        Ok(())
    }

    fn on_canceled(
        &self,
        details: &AppointmentDetails,
        scheduled_at: &NaiveDateTime,
        reason: Option<&str>,
    ) -> anyhow::Result<()> {
        self.dispatch(details, "canceled", render_canceled(details, scheduled_at, reason));
        Ok(())
    }

    fn on_rescheduled(
        &self,
        details: &AppointmentDetails,
        previous_at: &NaiveDateTime,
        scheduled_at: &NaiveDateTime,
    ) -> anyhow::Result<()> {
        self.dispatch(
            details,
            "rescheduled",
            render_rescheduled(details, previous_at, scheduled_at),
        );
        Ok(())
    }
}

fn when(at: &NaiveDateTime) -> String {
    format!("{} às {}", at.format("%d/%m/%Y"), at.format("%H:%M"))
}

pub fn render_created(details: &AppointmentDetails, scheduled_at: &NaiveDateTime) -> String {
    format!(
        "Olá {}! 🎉\n\n\
         Seu agendamento foi realizado com sucesso!\n\n\
         📋 Serviço: {}\n\
         📅 Data: {}\n\
         💈 Barbearia: {}\n\
         🔖 Código: {}\n\n\
         Aguardamos você!",
        details.customer_name,
        details.service_name,
        when(scheduled_at),
        details.shop_name,
        details.appointment_id,
    )
}

pub fn render_confirmed(details: &AppointmentDetails, scheduled_at: &NaiveDateTime) -> String {
    format!(
        "Olá {}! ✅\n\n\
         Seu agendamento está confirmado.\n\n\
         📋 Serviço: {}\n\
         📅 Data: {}\n\
         💈 Barbearia: {}\n\n\
         Até breve!",
        details.customer_name,
        details.service_name,
        when(scheduled_at),
        details.shop_name,
    )
}

pub fn render_canceled(
    details: &AppointmentDetails,
    scheduled_at: &NaiveDateTime,
    reason: Option<&str>,
) -> String {
    let reason = reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| format!("📝 Motivo: {r}\n"))
        .unwrap_or_default();
    format!(
        "Olá {}! ❌\n\n\
         Seu agendamento foi cancelado.\n\n\
         📋 Serviço: {}\n\
         📅 Data: {}\n\
         💈 Barbearia: {}\n\
         {}\n\
         Esperamos vê-lo em breve!",
        details.customer_name,
        details.service_name,
        when(scheduled_at),
        details.shop_name,
        reason,
    )
}

pub fn render_rescheduled(
    details: &AppointmentDetails,
    previous_at: &NaiveDateTime,
    scheduled_at: &NaiveDateTime,
) -> String {
    format!(
        "Olá {}! 🔄\n\n\
         Seu agendamento foi reagendado.\n\n\
         📋 Serviço: {}\n\
         📅 Data anterior: {}\n\
         📅 Nova data: {}\n\
         💈 Barbearia: {}\n\n\
         Aguardamos você!",
        details.customer_name,
        details.service_name,
        when(previous_at),
        when(scheduled_at),
        details.shop_name,
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    fn details() -> AppointmentDetails {
        AppointmentDetails::new(
            Uuid::new_v4(),
            "João Silva",
            "+5511999999999",
            "Corte e barba",
            "Barbearia Central",
        )
        .unwrap()
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    #[test]
    fn created_message_lists_details() {
        let details = details();
        let body = render_created(&details, &at(10, 14));
        assert!(body.starts_with("Olá João Silva! 🎉"));
        assert!(body.contains("Corte e barba"));
        assert!(body.contains("10/03/2025 às 14:30"));
        assert!(body.contains("Barbearia Central"));
        assert!(body.contains(&details.appointment_id.to_string()));
    }

    #[test]
    fn confirmed_message_has_check_mark() {
        let body = render_confirmed(&details(), &at(10, 14));
        assert!(body.starts_with("Olá João Silva! ✅"));
    }

    #[test]
    fn canceled_message_includes_reason_only_when_present() {
        let with_reason = render_canceled(&details(), &at(10, 14), Some("barbeiro doente"));
        assert!(with_reason.starts_with("Olá João Silva! ❌"));
        assert!(with_reason.contains("Motivo: barbeiro doente"));

        let without = render_canceled(&details(), &at(10, 14), None);
        assert!(!without.contains("Motivo"));
        let blank = render_canceled(&details(), &at(10, 14), Some("  "));
        assert!(!blank.contains("Motivo"));
    }

    #[test]
    fn rescheduled_message_shows_both_dates() {
        let body = render_rescheduled(&details(), &at(10, 14), &at(12, 9));
        assert!(body.starts_with("Olá João Silva! 🔄"));
        assert!(body.contains("Data anterior: 10/03/2025 às 14:30"));
        assert!(body.contains("Nova data: 12/03/2025 às 09:30"));
    }
}
