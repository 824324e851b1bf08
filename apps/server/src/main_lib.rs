use std::sync::Arc;

use crate::{
    auth::AuthManager,
    config::{Config, LogFormat},
};
use footprint_core::{
    business::{BusinessService, BusinessServiceTrait},
    carbon::{CarbonService, CarbonServiceTrait},
    goals::{GoalReconciler, GoalService, GoalServiceTrait},
    notifications::{NotificationService, NotificationServiceTrait},
    reminders::{DeadlineSweeper, DeadlineSweeperTrait},
};
use footprint_storage_sqlite::{
    db::{self, write_actor},
    AchievementRepository, CarbonRepository, GoalRepository, NotificationRepository,
    OrganizationRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub carbon_service: Arc<dyn CarbonServiceTrait>,
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub notification_service: Arc<dyn NotificationServiceTrait>,
    pub business_service: Arc<dyn BusinessServiceTrait>,
    pub sweeper: Arc<dyn DeadlineSweeperTrait>,
    pub auth: Arc<AuthManager>,
}

/// Installs the global subscriber. `log` records from core and storage are
/// bridged through `tracing-log`.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let carbon_repository = Arc::new(CarbonRepository::new(pool.clone(), writer.clone()));
    let goal_repository = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    let achievement_repository =
        Arc::new(AchievementRepository::new(pool.clone(), writer.clone()));
    let notification_repository =
        Arc::new(NotificationRepository::new(pool.clone(), writer.clone()));
    let organization_repository = Arc::new(OrganizationRepository::new(pool.clone()));

    let notification_service = Arc::new(NotificationService::new(notification_repository));
    let goal_reconciler = Arc::new(GoalReconciler::new(
        goal_repository.clone(),
        achievement_repository.clone(),
        carbon_repository.clone(),
        notification_service.clone(),
    ));
    let carbon_service = Arc::new(CarbonService::new(
        carbon_repository.clone(),
        goal_reconciler.clone(),
    ));
    let goal_service = Arc::new(GoalService::new(
        goal_repository.clone(),
        achievement_repository,
        goal_reconciler,
    ));
    let business_service = Arc::new(BusinessService::new(
        organization_repository,
        carbon_repository,
        goal_repository.clone(),
        notification_service.clone(),
    ));
    let sweeper = Arc::new(DeadlineSweeper::new(
        goal_repository,
        notification_service.clone(),
    ));

    Ok(Arc::new(AppState {
        carbon_service,
        goal_service,
        notification_service,
        business_service,
        sweeper,
        auth: Arc::new(AuthManager::new(&config.jwt_secret)),
    }))
}
