use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use resto_api::{create_router, AppState};
use resto_core::ports::Mailer;
use resto_core::services::HousekeepingService;
use resto_infrastructure::mail::MailTemplates;
use resto_infrastructure::{
    create_pool, postgres_repositories, run_migrations, spawn_housekeeping, LogMailer, SimulatedPaymentGateway,
    SmtpMailer,
};
use resto_shared::config::AppConfig;
use resto_shared::utils::mask_email;
use tracing::{error, info, warn};

const LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    let _telemetry_guard = resto_shared::telemetry::init_telemetry(&config.logging)?;

    info!("Resto server v{} starting ({})", env!("CARGO_PKG_VERSION"), config.app.env);

    // Database
    let pool = create_pool(&config.database).await.context("failed to connect to database")?;
    info!("Database connection established");

    if config.database.run_migrations {
        run_migrations(&pool).await.context("failed to run migrations")?;
    }

    let repos = postgres_repositories(pool.clone());

    // Outbound ports
    let templates = MailTemplates::new(
        &config.app.name,
        &config.app.public_base_url,
        config.auth.reset_token_ttl_minutes,
    )?;
    let mailer: Arc<dyn Mailer> = if config.mail.enabled {
        info!("Sending mail through SMTP relay {}", config.mail.smtp_host);
        Arc::new(SmtpMailer::new(&config.mail, templates)?)
    } else {
        warn!("Mail delivery disabled, messages are only logged");
        Arc::new(LogMailer::new(templates))
    };
    let gateway = Arc::new(SimulatedPaymentGateway::new(Duration::from_millis(
        config.payment.simulated_latency_ms,
    )));

    // Background jobs
    let housekeeping = spawn_housekeeping(
        Arc::new(HousekeepingService::new(
            repos.sessions.clone(),
            repos.resets.clone(),
            repos.registrations.clone(),
        )),
        Duration::from_secs(config.housekeeping.interval_seconds.max(1)),
    );

    let addr = SocketAddr::from((
        config.app.host.parse::<std::net::IpAddr>().context("invalid app.host")?,
        config.app.port,
    ));

    let state = AppState::new(pool.clone(), config, repos, mailer, gateway);
    bootstrap_root_admin(&state).await?;

    let limiters = state.limiters.clone();
    let limiter_cleanup = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LIMITER_CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            limiters.retain_recent();
        }
    });

    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    housekeeping.abort();
    limiter_cleanup.abort();
    pool.close().await;
    info!("Server stopped");

    Ok(())
}

/// Create the platform root admin from `ROOT_ADMIN_*` variables when none exists
async fn bootstrap_root_admin(state: &AppState) -> anyhow::Result<()> {
    let (Ok(username), Ok(email), Ok(password)) = (
        std::env::var("ROOT_ADMIN_USERNAME"),
        std::env::var("ROOT_ADMIN_EMAIL"),
        std::env::var("ROOT_ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    if state
        .admins
        .ensure_root_admin(&username, &email, &password)
        .await
        .context("failed to bootstrap root admin")?
    {
        info!("Root admin {} ({}) created", username, mask_email(&email));
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
