//! Background loop driving [`HousekeepingService`]

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

use resto_core::services::HousekeepingService;

/// Runs a cleanup pass every `every`, starting one interval after spawn.
/// Failures are logged and retried on the next tick.
pub fn spawn_housekeeping(service: Arc<HousekeepingService>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First tick fires immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match service.run_once().await {
                Ok(report) => debug!(?report, "Housekeeping pass finished"),
                Err(e) => error!("Housekeeping pass failed: {}", e),
            }
        }
    })
}
