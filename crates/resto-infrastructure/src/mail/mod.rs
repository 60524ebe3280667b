//! Outbound mail adapters

pub mod templates;
pub mod smtp_mailer;
pub mod log_mailer;

pub use templates::{MailTemplates, RenderedMail};
pub use smtp_mailer::SmtpMailer;
pub use log_mailer::LogMailer;
