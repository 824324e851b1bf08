use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::reminders::reminders_model::SweepReport;

/// Trait for the periodic deadline reminder sweep
#[async_trait]
pub trait DeadlineSweeperTrait: Send + Sync {
    async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepReport>;
}
