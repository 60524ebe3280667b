//! Periodic cleanup of expired auth state and stale registrations

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::DomainError;
use crate::repositories::{PasswordResetRepository, RegistrationRepository, SessionRepository};

/// Used or expired reset tokens are kept this long for auditing
const RESET_TOKEN_RETENTION_HOURS: i64 = 24;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct HousekeepingReport {
    pub sessions_removed: u64,
    pub reset_tokens_removed: u64,
    pub registrations_expired: u64,
}

pub struct HousekeepingService {
    sessions: Arc<dyn SessionRepository>,
    resets: Arc<dyn PasswordResetRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl HousekeepingService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        resets: Arc<dyn PasswordResetRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self { sessions, resets, registrations }
    }

    pub async fn run_once(&self) -> Result<HousekeepingReport, DomainError> {
        let now = Utc::now();
        let report = HousekeepingReport {
            sessions_removed: self.sessions.delete_expired(now).await?,
            reset_tokens_removed: self
                .resets
                .purge(now - Duration::hours(RESET_TOKEN_RETENTION_HOURS))
                .await?,
            registrations_expired: self.registrations.expire_stale(now).await?,
        };

        if report != HousekeepingReport::default() {
            info!(
                sessions = report.sessions_removed,
                reset_tokens = report.reset_tokens_removed,
                registrations = report.registrations_expired,
                "Housekeeping pass finished"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::registration_repository::MockRegistrationRepository;
    use crate::repositories::session_repository::{MockPasswordResetRepository, MockSessionRepository};

    #[tokio::test]
    async fn test_run_once_reports_counts() {
        let mut sessions = MockSessionRepository::new();
        sessions.expect_delete_expired().times(1).returning(|_| Ok(3));
        let mut resets = MockPasswordResetRepository::new();
        resets
            .expect_purge()
            .withf(|before| *before < Utc::now() - Duration::hours(23))
            .returning(|_| Ok(1));
        let mut registrations = MockRegistrationRepository::new();
        registrations.expect_expire_stale().returning(|_| Ok(0));

        let report = HousekeepingService::new(Arc::new(sessions), Arc::new(resets), Arc::new(registrations))
            .run_once()
            .await
            .unwrap();
        assert_eq!(
            report,
            HousekeepingReport { sessions_removed: 3, reset_tokens_removed: 1, registrations_expired: 0 }
        );
    }
}
