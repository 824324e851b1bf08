//! In-memory repositories and wiring shared by the service tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::business::{
    BusinessService, Organization, OrganizationMember, OrganizationRepositoryTrait,
};
use crate::carbon::{
    total_co2, CarbonEntry, CarbonRepositoryTrait, CarbonService, DateRange, EmissionCategory,
    NewCarbonEntry,
};
use crate::errors::{DatabaseError, Result};
use crate::goals::{
    Achievement, AchievementRepositoryTrait, Goal, GoalReconciler, GoalRepositoryTrait,
    GoalService, GoalStatus, NewAchievement, NewGoal,
};
use crate::notifications::{
    NewNotification, Notification, NotificationRepositoryTrait, NotificationService,
    NotificationSettings, NotificationType,
};
use crate::reminders::DeadlineSweeper;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn now_naive() -> chrono::NaiveDateTime {
    Utc::now().naive_utc()
}

// --- Carbon ledger ---
#[derive(Default)]
pub struct InMemoryCarbonRepository {
    pub entries: Mutex<Vec<CarbonEntry>>,
    pub fail_appends: Mutex<bool>,
}

#[async_trait]
impl CarbonRepositoryTrait for InMemoryCarbonRepository {
    async fn append_entries(&self, entries: Vec<NewCarbonEntry>) -> Result<Vec<CarbonEntry>> {
        if *self.fail_appends.lock().unwrap() {
            return Err(DatabaseError::TransactionFailed("disk full".to_string()).into());
        }
        let created: Vec<CarbonEntry> = entries
            .into_iter()
            .map(|e| CarbonEntry {
                id: Uuid::new_v4().to_string(),
                user_id: e.user_id,
                category: e.category,
                activity_type: e.activity_type,
                quantity: e.quantity,
                emission_factor: e.emission_factor,
                co2_amount: e.co2_amount,
                date: e.date,
                created_at: now_naive(),
            })
            .collect();
        self.entries.lock().unwrap().extend(created.iter().cloned());
        Ok(created)
    }

    fn list_entries(&self, user_id: &str, range: Option<DateRange>) -> Result<Vec<CarbonEntry>> {
        let mut entries: Vec<CarbonEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| range.map_or(true, |r| r.contains(e.date)))
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.date);
        Ok(entries)
    }

    fn sum_co2_by_category(
        &self,
        user_id: &str,
        category: EmissionCategory,
        range: Option<DateRange>,
    ) -> Result<Decimal> {
        total_co2(
            self.list_entries(user_id, range)?
                .iter()
                .filter(|e| e.category == category),
        )
    }

    async fn delete_entries_for_day(&self, user_id: &str, day: NaiveDate) -> Result<usize> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| !(e.user_id == user_id && e.date == day));
        Ok(before - entries.len())
    }
}

// --- Goals ---
#[derive(Default)]
pub struct InMemoryGoalRepository {
    pub goals: Mutex<Vec<Goal>>,
    /// Goal ids whose writes fail.
    pub failing_goal_ids: Mutex<HashSet<String>>,
}

impl InMemoryGoalRepository {
    pub fn goal(&self, goal_id: &str) -> Goal {
        self.get_goal(goal_id).unwrap()
    }

    fn check_writable(&self, goal_id: &str) -> Result<()> {
        if self.failing_goal_ids.lock().unwrap().contains(goal_id) {
            return Err(DatabaseError::QueryFailed(format!("goal {} is corrupt", goal_id)).into());
        }
        Ok(())
    }

    fn modify(&self, goal_id: &str, f: impl FnOnce(&mut Goal)) -> Result<Goal> {
        self.check_writable(goal_id)?;
        let mut goals = self.goals.lock().unwrap();
        let goal = goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| DatabaseError::NotFound(goal_id.to_string()))?;
        f(goal);
        goal.updated_at = now_naive();
        Ok(goal.clone())
    }
}

#[async_trait]
impl GoalRepositoryTrait for InMemoryGoalRepository {
    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.goals
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == goal_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(goal_id.to_string()).into())
    }

    fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    fn list_category_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        Ok(self
            .list_goals(user_id)?
            .into_iter()
            .filter(|g| g.category.is_some())
            .collect())
    }

    fn list_pending_goals_due_by(&self, cutoff: NaiveDate) -> Result<Vec<Goal>> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.is_pending() && g.deadline <= cutoff)
            .cloned()
            .collect())
    }

    async fn insert_goal(&self, user_id: &str, new_goal: NewGoal) -> Result<Goal> {
        let now = now_naive();
        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: new_goal.title,
            target_value: new_goal.target_value,
            current_value: new_goal.current_value.unwrap_or_default(),
            unit: new_goal.unit,
            deadline: new_goal.deadline,
            status: GoalStatus::Pending,
            category: new_goal.category,
            created_at: now,
            updated_at: now,
        };
        self.goals.lock().unwrap().push(goal.clone());
        Ok(goal)
    }

    async fn update_goal_progress(&self, goal_id: &str, current_value: Decimal) -> Result<Goal> {
        self.modify(goal_id, |g| g.current_value = current_value)
    }

    async fn complete_goal_if_pending(
        &self,
        goal_id: &str,
        current_value: Decimal,
    ) -> Result<Option<Goal>> {
        self.check_writable(goal_id)?;
        if !self.get_goal(goal_id)?.is_pending() {
            return Ok(None);
        }
        self.modify(goal_id, |g| {
            g.current_value = current_value;
            g.status = GoalStatus::Completed;
        })
        .map(Some)
    }

    async fn set_goal_status(&self, goal_id: &str, status: GoalStatus) -> Result<Goal> {
        self.modify(goal_id, |g| g.status = status)
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<usize> {
        let mut goals = self.goals.lock().unwrap();
        let before = goals.len();
        goals.retain(|g| g.id != goal_id);
        Ok(before - goals.len())
    }
}

#[derive(Default)]
pub struct InMemoryAchievementRepository {
    pub achievements: Mutex<Vec<Achievement>>,
}

#[async_trait]
impl AchievementRepositoryTrait for InMemoryAchievementRepository {
    fn list_achievements(&self, user_id: &str) -> Result<Vec<Achievement>> {
        Ok(self
            .achievements
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_achievement(&self, new_achievement: NewAchievement) -> Result<Achievement> {
        let achievement = Achievement {
            id: Uuid::new_v4().to_string(),
            user_id: new_achievement.user_id,
            goal_id: new_achievement.goal_id,
            title: new_achievement.title,
            target_value: new_achievement.target_value,
            unit: new_achievement.unit,
            completed_at: new_achievement.completed_at,
        };
        self.achievements.lock().unwrap().push(achievement.clone());
        Ok(achievement)
    }
}

// --- Notifications ---
#[derive(Default)]
pub struct InMemoryNotificationRepository {
    pub notifications: Mutex<Vec<Notification>>,
    pub settings: Mutex<Vec<NotificationSettings>>,
    pub fail_inserts: Mutex<bool>,
}

impl InMemoryNotificationRepository {
    pub fn of_type(&self, user_id: &str, notification_type: NotificationType) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id && n.notification_type == notification_type)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationRepositoryTrait for InMemoryNotificationRepository {
    fn list_notifications(&self, user_id: &str, limit: i64) -> Result<Vec<Notification>> {
        let mut list: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(list)
    }

    fn find_latest(
        &self,
        user_id: &str,
        goal_id: &str,
        notification_type: NotificationType,
        dedupe_key: &str,
    ) -> Result<Option<Notification>> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| {
                n.user_id == user_id
                    && n.goal_id.as_deref() == Some(goal_id)
                    && n.notification_type == notification_type
                    && n.dedupe_key.as_deref() == Some(dedupe_key)
            })
            .max_by_key(|n| n.created_at)
            .cloned())
    }

    async fn insert_notification(
        &self,
        new_notification: NewNotification,
    ) -> Result<Notification> {
        if *self.fail_inserts.lock().unwrap() {
            return Err(DatabaseError::ConnectionFailed("store unavailable".to_string()).into());
        }
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: new_notification.user_id,
            notification_type: new_notification.notification_type,
            message: new_notification.message,
            goal_id: new_notification.goal_id,
            dedupe_key: new_notification.dedupe_key,
            read: false,
            created_at: new_notification.created_at,
        };
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(notification)
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        let mut count = 0;
        for n in self.notifications.lock().unwrap().iter_mut() {
            if n.user_id == user_id && !n.read {
                n.read = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_all(&self, user_id: &str) -> Result<usize> {
        let mut list = self.notifications.lock().unwrap();
        let before = list.len();
        list.retain(|n| n.user_id != user_id);
        Ok(before - list.len())
    }

    async fn delete_notifications(&self, user_id: &str, ids: Vec<String>) -> Result<usize> {
        let mut list = self.notifications.lock().unwrap();
        let before = list.len();
        list.retain(|n| !(n.user_id == user_id && ids.contains(&n.id)));
        Ok(before - list.len())
    }

    fn get_settings(&self, user_id: &str) -> Result<Option<NotificationSettings>> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn upsert_settings(
        &self,
        settings: NotificationSettings,
    ) -> Result<NotificationSettings> {
        let mut stored = self.settings.lock().unwrap();
        stored.retain(|s| s.user_id != settings.user_id);
        stored.push(settings.clone());
        Ok(settings)
    }
}

// --- Organizations ---
#[derive(Default)]
pub struct InMemoryOrganizationRepository {
    pub organizations: Mutex<Vec<Organization>>,
    pub members: Mutex<Vec<OrganizationMember>>,
}

impl InMemoryOrganizationRepository {
    pub fn add_organization(&self, id: &str, admin_user_id: &str, name: &str) {
        self.organizations.lock().unwrap().push(Organization {
            id: id.to_string(),
            admin_user_id: admin_user_id.to_string(),
            name: name.to_string(),
            created_at: now_naive(),
        });
    }

    pub fn add_member(&self, organization_id: &str, user_id: &str, display_name: &str) {
        self.members.lock().unwrap().push(OrganizationMember {
            user_id: user_id.to_string(),
            organization_id: organization_id.to_string(),
            display_name: display_name.to_string(),
            email: format!("{}@example.com", user_id),
            joined_at: now_naive(),
        });
    }
}

impl OrganizationRepositoryTrait for InMemoryOrganizationRepository {
    fn get_organization_for_admin(&self, admin_user_id: &str) -> Result<Option<Organization>> {
        Ok(self
            .organizations
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.admin_user_id == admin_user_id)
            .cloned())
    }

    fn list_members(&self, organization_id: &str) -> Result<Vec<OrganizationMember>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.organization_id == organization_id)
            .cloned()
            .collect())
    }

    fn get_member(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<OrganizationMember>> {
        Ok(self
            .list_members(organization_id)?
            .into_iter()
            .find(|m| m.user_id == user_id))
    }
}

/// Every service wired against the in-memory repositories.
pub struct Harness {
    pub carbon_repository: Arc<InMemoryCarbonRepository>,
    pub goal_repository: Arc<InMemoryGoalRepository>,
    pub achievement_repository: Arc<InMemoryAchievementRepository>,
    pub notification_repository: Arc<InMemoryNotificationRepository>,
    pub organization_repository: Arc<InMemoryOrganizationRepository>,
    pub notification_service: Arc<NotificationService>,
    pub reconciler: Arc<GoalReconciler>,
    pub carbon_service: CarbonService,
    pub goal_service: GoalService,
    pub sweeper: DeadlineSweeper,
    pub business_service: BusinessService,
}

impl Harness {
    pub fn new() -> Self {
        let carbon_repository = Arc::new(InMemoryCarbonRepository::default());
        let goal_repository = Arc::new(InMemoryGoalRepository::default());
        let achievement_repository = Arc::new(InMemoryAchievementRepository::default());
        let notification_repository = Arc::new(InMemoryNotificationRepository::default());
        let organization_repository = Arc::new(InMemoryOrganizationRepository::default());

        let notification_service =
            Arc::new(NotificationService::new(notification_repository.clone()));
        let reconciler = Arc::new(GoalReconciler::new(
            goal_repository.clone(),
            achievement_repository.clone(),
            carbon_repository.clone(),
            notification_service.clone(),
        ));

        Harness {
            carbon_service: CarbonService::new(carbon_repository.clone(), reconciler.clone()),
            goal_service: GoalService::new(
                goal_repository.clone(),
                achievement_repository.clone(),
                reconciler.clone(),
            ),
            sweeper: DeadlineSweeper::new(goal_repository.clone(), notification_service.clone()),
            business_service: BusinessService::new(
                organization_repository.clone(),
                carbon_repository.clone(),
                goal_repository.clone(),
                notification_service.clone(),
            ),
            carbon_repository,
            goal_repository,
            achievement_repository,
            notification_repository,
            organization_repository,
            notification_service,
            reconciler,
        }
    }

    pub fn achievement_alerts(&self, user_id: &str) -> Vec<Notification> {
        self.notification_repository
            .of_type(user_id, NotificationType::AchievementAlerts)
    }

    pub fn reminders(&self, user_id: &str) -> Vec<Notification> {
        self.notification_repository
            .of_type(user_id, NotificationType::GoalReminders)
    }
}
