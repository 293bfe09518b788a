use anyhow::Context;
use tokio::main;
use tokio::runtime::Handle;

use barbershop_notify::{
    application::services::messenger::MessagingGateway,
    config::Config,
    domain::{models::SendOutcome, value_objects::Document},
    infrastructure::messaging::twilio::TwilioClient,
    telemetry,
};

const USAGE: &str = "usage: barbershop-notify [validate <cpf|cnpj> | send-test <phone>]";

#[main]
async fn main() -> anyhow::Result<()> {
    let config = Config::try_parse().context("failed to load configuration")?;
    telemetry::init(config.log_filter.as_deref());

    let provider = TwilioClient::new(&config.twilio_base_url, &config.gateway)?;
    let gateway = MessagingGateway::new(provider, config.gateway.clone(), Handle::current());

    tracing::info!(
        available = gateway.is_available(),
        enabled = config.gateway.enabled,
        from = %config.gateway.from_number,
        "WhatsApp gateway ready"
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => Ok(()),
        ["validate", input] => {
            match Document::parse(input) {
                Some(document) => println!("{} {}: valid", document.kind().as_str(), document.formatted()),
                None => println!("{input}: invalid"),
            }
            Ok(())
        }
        ["send-test", phone] => {
            let outcome = gateway
                .send_whatsapp(phone, "Olá! ✅ Esta é uma mensagem de teste da barbearia.")
                .await
                .context("send task panicked")??;
            match outcome {
                SendOutcome::Sent { message_id, attempts } => {
                    tracing::info!(%message_id, attempts = attempts.len(), "Test message delivered")
                }
                SendOutcome::Skipped(reason) => {
                    tracing::warn!(?reason, "Test message skipped")
                }
            }
            Ok(())
        }
        _ => anyhow::bail!(USAGE),
    }
}
