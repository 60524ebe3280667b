// ============================================================================
// Resto Infrastructure - SMTP Mailer
// File: crates/resto-infrastructure/src/mail/smtp_mailer.rs
// ============================================================================

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use resto_core::error::DomainError;
use resto_core::ports::Mailer;
use resto_shared::config::MailSettings;
use resto_shared::utils::mask_email;

use super::templates::{MailTemplates, RenderedMail};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    templates: MailTemplates,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings, templates: MailTemplates) -> Result<Self, DomainError> {
        let from: Mailbox = settings
            .from_address
            .parse()
            .map_err(|e| DomainError::ValidationError(format!("mail.from_address: {}", e)))?;

        // Local relays (mailpit, mailhog) speak plain SMTP
        let mut builder = if settings.smtp_host == "localhost" || settings.smtp_host == "127.0.0.1" {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
                .map_err(|e| DomainError::NotificationError(e.to_string()))?
        };
        builder = builder.port(settings.smtp_port);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self { transport: builder.build(), from, templates })
    }

    async fn deliver(&self, to: &str, mail: RenderedMail) -> Result<(), DomainError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|e| DomainError::NotificationError(format!("invalid recipient: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(mail.subject)
            .multipart(MultiPart::alternative_plain_html(mail.text, mail.html))
            .map_err(|e| DomainError::NotificationError(e.to_string()))?;

        self.transport.send(message).await.map_err(|e| {
            error!("SMTP delivery to {} failed: {}", mask_email(to), e);
            DomainError::NotificationError(e.to_string())
        })?;

        info!("Mail sent to {}", mask_email(to));
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, to: &str, username: &str, reset_link: &str) -> Result<(), DomainError> {
        let mail = self.templates.password_reset(username, reset_link)?;
        self.deliver(to, mail).await
    }

    async fn send_welcome(&self, to: &str, username: &str, restaurant_name: &str) -> Result<(), DomainError> {
        let mail = self.templates.welcome(username, restaurant_name)?;
        self.deliver(to, mail).await
    }
}
