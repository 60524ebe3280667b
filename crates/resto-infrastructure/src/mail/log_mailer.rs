//! Mailer used when SMTP delivery is disabled: renders and logs instead of sending

use async_trait::async_trait;
use tracing::info;

use resto_core::error::DomainError;
use resto_core::ports::Mailer;
use resto_shared::utils::mask_email;

use super::templates::MailTemplates;

pub struct LogMailer {
    templates: MailTemplates,
}

impl LogMailer {
    pub fn new(templates: MailTemplates) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, to: &str, username: &str, reset_link: &str) -> Result<(), DomainError> {
        let mail = self.templates.password_reset(username, reset_link)?;
        info!(to = %mask_email(to), subject = %mail.subject, "Mail delivery disabled; password reset link: {}", reset_link);
        Ok(())
    }

    async fn send_welcome(&self, to: &str, username: &str, restaurant_name: &str) -> Result<(), DomainError> {
        let mail = self.templates.welcome(username, restaurant_name)?;
        info!(to = %mask_email(to), subject = %mail.subject, "Mail delivery disabled; welcome mail skipped");
        Ok(())
    }
}
