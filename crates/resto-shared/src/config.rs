//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub mail: MailSettings,
    pub payment: PaymentSettings,
    pub rate_limit: RateLimitSettings,
    pub cors: CorsSettings,
    pub logging: LoggingSettings,
    pub housekeeping: HousekeepingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Base URL of the web front-end, used in emailed links
    pub public_base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub session_ttl_hours: i64,
    pub remember_me_ttl_days: i64,
    pub max_failed_attempts: i32,
    pub lockout_minutes: i64,
    pub reset_token_ttl_minutes: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub min_password_score: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailSettings {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentSettings {
    pub simulated_latency_ms: u64,
    pub registration_ttl_hours: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitSettings {
    /// Login and password-reset requests
    pub login_per_minute: u32,
    /// Registration start and payment attempts
    pub registration_per_minute: u32,
    pub public_orders_per_minute: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    /// `json` or `pretty`
    pub format: String,
    pub directory: String,
    pub file_prefix: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HousekeepingSettings {
    pub interval_seconds: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::builder(&env)?.build()?.try_deserialize()
    }

    fn builder(env: &str) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("app.env", env)?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "resto-server")?
            .set_default("app.public_base_url", "http://localhost:5173")?
            .set_default("app.request_timeout_seconds", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_seconds", 3)?
            .set_default("database.run_migrations", true)?
            .set_default("auth.session_ttl_hours", 24)?
            .set_default("auth.remember_me_ttl_days", 30)?
            .set_default("auth.max_failed_attempts", 5)?
            .set_default("auth.lockout_minutes", 15)?
            .set_default("auth.reset_token_ttl_minutes", 60)?
            .set_default("auth.cookie_name", crate::constants::DEFAULT_SESSION_COOKIE)?
            .set_default("auth.cookie_secure", false)?
            .set_default("auth.min_password_score", 2)?
            .set_default("mail.enabled", false)?
            .set_default("mail.smtp_host", "localhost")?
            .set_default("mail.smtp_port", 587)?
            .set_default("mail.from_address", "Resto <no-reply@localhost>")?
            .set_default("payment.simulated_latency_ms", 0)?
            .set_default("payment.registration_ttl_hours", 24)?
            .set_default("payment.currency", crate::constants::DEFAULT_CURRENCY)?
            .set_default("rate_limit.login_per_minute", 10)?
            .set_default("rate_limit.registration_per_minute", 5)?
            .set_default("rate_limit.public_orders_per_minute", 20)?
            .set_default("cors.allowed_origins", vec!["http://localhost:5173".to_string()])?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("logging.directory", "logs")?
            .set_default("logging.file_prefix", "resto")?
            .set_default("housekeeping.interval_seconds", 300)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_need_only_database_url() {
        let config: AppConfig = AppConfig::builder("test")
            .unwrap()
            .set_override("database.url", "postgres://localhost/resto_test")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.app.port, 8080);
        assert_eq!(config.auth.max_failed_attempts, 5);
        assert_eq!(config.auth.cookie_name, "resto_session");
        assert_eq!(config.rate_limit.login_per_minute, 10);
        assert_eq!(config.rate_limit.registration_per_minute, 5);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5173".to_string()]);
        assert!(!config.mail.enabled);
    }

    #[test]
    fn test_missing_database_url_fails() {
        let result: Result<AppConfig, _> = AppConfig::builder("test")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize();
        assert!(result.is_err());
    }
}
