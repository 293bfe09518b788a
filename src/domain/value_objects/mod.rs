pub mod document;
pub mod phone;

pub use document::{Document, DocumentKind, validate_cnpj, validate_cpf};
pub use phone::{WhatsAppNumber, channel_address};
