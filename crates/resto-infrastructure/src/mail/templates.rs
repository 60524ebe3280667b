//! Handlebars templates for transactional mail

use handlebars::Handlebars;
use serde_json::json;

use resto_core::error::DomainError;

const PASSWORD_RESET_HTML: &str = include_str!("../../templates/password_reset.hbs");
const PASSWORD_RESET_TEXT: &str = include_str!("../../templates/password_reset.txt.hbs");
const WELCOME_HTML: &str = include_str!("../../templates/welcome.hbs");
const WELCOME_TEXT: &str = include_str!("../../templates/welcome.txt.hbs");

#[derive(Debug, Clone)]
pub struct RenderedMail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub struct MailTemplates {
    registry: Handlebars<'static>,
    app_name: String,
    login_link: String,
    reset_ttl_minutes: i64,
}

impl MailTemplates {
    pub fn new(app_name: &str, public_base_url: &str, reset_ttl_minutes: i64) -> Result<Self, DomainError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);

        for (name, source) in [
            ("password_reset", PASSWORD_RESET_HTML),
            ("password_reset_text", PASSWORD_RESET_TEXT),
            ("welcome", WELCOME_HTML),
            ("welcome_text", WELCOME_TEXT),
        ] {
            registry
                .register_template_string(name, source)
                .map_err(|e| DomainError::InternalError(format!("mail template {}: {}", name, e)))?;
        }

        Ok(Self {
            registry,
            app_name: app_name.to_string(),
            login_link: format!("{}/login", public_base_url.trim_end_matches('/')),
            reset_ttl_minutes,
        })
    }

    pub fn password_reset(&self, username: &str, reset_link: &str) -> Result<RenderedMail, DomainError> {
        let data = json!({
            "app_name": self.app_name,
            "username": username,
            "reset_link": reset_link,
            "ttl_minutes": self.reset_ttl_minutes,
        });

        Ok(RenderedMail {
            subject: format!("{}: password reset", self.app_name),
            text: self.render("password_reset_text", &data)?,
            html: self.render("password_reset", &data)?,
        })
    }

    pub fn welcome(&self, username: &str, restaurant_name: &str) -> Result<RenderedMail, DomainError> {
        let data = json!({
            "app_name": self.app_name,
            "username": username,
            "restaurant_name": restaurant_name,
            "login_link": self.login_link,
        });

        Ok(RenderedMail {
            subject: format!("Welcome to {}", self.app_name),
            text: self.render("welcome_text", &data)?,
            html: self.render("welcome", &data)?,
        })
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, DomainError> {
        self.registry
            .render(name, data)
            .map_err(|e| DomainError::NotificationError(format!("rendering {}: {}", name, e)))
    }
}
