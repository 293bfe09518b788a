pub mod status_logger;
pub mod whatsapp_notifier;
