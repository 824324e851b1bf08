//! Background scheduler for the deadline sweep.
//!
//! Owned by `main`: started once the state is built and shut down after the
//! HTTP server has drained.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use footprint_core::reminders::DeadlineSweeperTrait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

pub struct ReminderScheduler {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReminderScheduler {
    /// Spawns the sweep loop. The first sweep runs immediately.
    pub fn start(sweeper: Arc<dyn DeadlineSweeperTrait>, every: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            info!("Reminder scheduler started ({}s interval)", every.as_secs());
            let mut ticker = interval(every);
            // A sweep that overruns the period must not trigger a burst of catch-up sweeps.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => run_scheduled_sweep(sweeper.as_ref()).await,
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("Reminder scheduler stopped");
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signals the loop and waits for an in-flight sweep to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!("Reminder scheduler task ended abnormally: {}", e);
        }
    }
}

async fn run_scheduled_sweep(sweeper: &dyn DeadlineSweeperTrait) {
    match sweeper.sweep(Utc::now()).await {
        Ok(report) if report.skipped_overlapping => {
            debug!("Scheduled sweep skipped: previous sweep still running");
        }
        Ok(report) => info!(
            "Scheduled sweep finished: {} goals scanned, {} reminders sent, {} suppressed, {} failures",
            report.goals_scanned, report.reminders_sent, report.suppressed, report.failures
        ),
        Err(e) => warn!("Scheduled sweep failed: {}", e),
    }
}
