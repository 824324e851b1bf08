#[cfg(test)]
mod tests {
    use crate::carbon::{
        ActivityQuantities, CarbonEntry, CarbonError, CarbonService, CarbonServiceTrait,
        EmissionCategory,
    };
    use crate::errors::{Error, Result};
    use crate::goals::{
        Goal, GoalCategory, GoalReconciler, GoalReconcilerTrait, GoalServiceTrait, GoalStatus,
        NewGoal, ReconciliationReport,
    };
    use crate::notifications::{NotificationServiceTrait, NotificationSettingsUpdate};
    use crate::test_support::{day, Harness};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    const USER: &str = "user-1";

    fn activities(items: &[(&str, Decimal)]) -> ActivityQuantities {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    fn electricity_goal(target: Decimal) -> NewGoal {
        NewGoal {
            title: "Cap electricity".to_string(),
            target_value: target,
            current_value: None,
            unit: "kg CO2".to_string(),
            deadline: day(2025, 6, 8),
            category: Some(GoalCategory::Electricity),
        }
    }

    async fn create_electricity_goal(h: &Harness, target: Decimal) -> String {
        h.goal_service
            .create_goal(USER, electricity_goal(target), day(2025, 6, 1))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_record_activities_converts_and_skips_zero_quantities() {
        let h = Harness::new();
        let created = h
            .carbon_service
            .record_activities(
                USER,
                day(2025, 6, 1),
                &activities(&[("petrol", dec!(10)), ("beef", dec!(0)), ("rice", dec!(1.5))]),
            )
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        let petrol = created.iter().find(|e| e.activity_type == "petrol").unwrap();
        assert_eq!(petrol.co2_amount, dec!(23.10));
        assert_eq!(petrol.category, EmissionCategory::Transport);
        assert_eq!(petrol.emission_factor, dec!(2.31));
        let rice = created.iter().find(|e| e.activity_type == "rice").unwrap();
        assert_eq!(rice.co2_amount, dec!(6.0));
    }

    #[tokio::test]
    async fn test_unknown_activity_rejects_whole_batch() {
        let h = Harness::new();
        let err = h
            .carbon_service
            .record_activities(
                USER,
                day(2025, 6, 1),
                &activities(&[("electricity", dec!(5)), ("coal", dec!(1))]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Carbon(_)));
        assert!(h.carbon_repository.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_quantity_rejected_without_writes() {
        let h = Harness::new();
        let result = h
            .carbon_service
            .record_activities(
                USER,
                day(2025, 6, 1),
                &activities(&[("waste", dec!(-2))]),
            )
            .await;

        assert!(result.is_err());
        assert!(h.carbon_repository.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_crossing_target_completes_goal_with_single_achievement() {
        let h = Harness::new();
        let goal_id = create_electricity_goal(&h, dec!(40)).await;
        assert!(h.achievement_alerts(USER).is_empty());

        // 30 kWh + 20 kWh at 0.82 = 41 kg
        h.carbon_service
            .record_activities(USER, day(2025, 6, 1), &activities(&[("electricity", dec!(30))]))
            .await
            .unwrap();
        assert_eq!(h.goal_repository.goal(&goal_id).status, GoalStatus::Pending);

        h.carbon_service
            .record_activities(USER, day(2025, 6, 2), &activities(&[("electricity", dec!(20))]))
            .await
            .unwrap();

        let goal = h.goal_repository.goal(&goal_id);
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.current_value, dec!(41.00));
        assert_eq!(h.achievement_alerts(USER).len(), 1);
        assert_eq!(h.goal_service.get_achievements(USER).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_completed_goal_is_not_announced_again() {
        let h = Harness::new();
        let goal_id = create_electricity_goal(&h, dec!(40)).await;

        for d in 1..=3 {
            h.carbon_service
                .record_activities(USER, day(2025, 6, d), &activities(&[("electricity", dec!(60))]))
                .await
                .unwrap();
        }
        h.reconciler.reconcile_user_goals(USER).await.unwrap();

        assert_eq!(h.achievement_alerts(USER).len(), 1);
        assert_eq!(h.goal_repository.goal(&goal_id).current_value, dec!(147.60));
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() {
        let h = Harness::new();
        let goal_id = create_electricity_goal(&h, dec!(100)).await;
        h.carbon_service
            .record_activities(USER, day(2025, 6, 1), &activities(&[("electricity", dec!(12.5))]))
            .await
            .unwrap();

        let before = h.goal_repository.goal(&goal_id);
        let first = h.reconciler.reconcile_user_goals(USER).await.unwrap();
        let second = h.reconciler.reconcile_user_goals(USER).await.unwrap();
        let after = h.goal_repository.goal(&goal_id);

        assert_eq!(before.current_value, dec!(10.25));
        assert_eq!(after.current_value, before.current_value);
        assert_eq!(after.status, before.status);
        assert_eq!(after.updated_at, before.updated_at);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_deleting_day_lowers_progress_but_keeps_completion() {
        let h = Harness::new();
        let goal_id = create_electricity_goal(&h, dec!(40)).await;
        h.carbon_service
            .record_activities(USER, day(2025, 6, 1), &activities(&[("electricity", dec!(10))]))
            .await
            .unwrap();
        h.carbon_service
            .record_activities(USER, day(2025, 6, 2), &activities(&[("electricity", dec!(40))]))
            .await
            .unwrap();
        assert_eq!(h.goal_repository.goal(&goal_id).status, GoalStatus::Completed);

        let deleted = h
            .carbon_service
            .delete_entries_for_day(USER, day(2025, 6, 2))
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        let goal = h.goal_repository.goal(&goal_id);
        assert_eq!(goal.current_value, dec!(8.20));
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(h.achievement_alerts(USER).len(), 1);
    }

    #[tokio::test]
    async fn test_manual_reopen_then_crossing_again_refires_once() {
        let h = Harness::new();
        let goal_id = create_electricity_goal(&h, dec!(40)).await;
        h.carbon_service
            .record_activities(USER, day(2025, 6, 1), &activities(&[("electricity", dec!(50))]))
            .await
            .unwrap();
        assert_eq!(h.achievement_alerts(USER).len(), 1);

        let reopened = h.goal_service.toggle_goal(USER, &goal_id).await.unwrap();
        assert_eq!(reopened.status, GoalStatus::Pending);
        assert_eq!(h.achievement_alerts(USER).len(), 1);

        h.carbon_service
            .record_activities(USER, day(2025, 6, 2), &activities(&[("electricity", dec!(5))]))
            .await
            .unwrap();
        h.carbon_service
            .record_activities(USER, day(2025, 6, 3), &activities(&[("electricity", dec!(5))]))
            .await
            .unwrap();

        assert_eq!(h.goal_repository.goal(&goal_id).status, GoalStatus::Completed);
        assert_eq!(h.achievement_alerts(USER).len(), 2);
    }

    #[tokio::test]
    async fn test_failing_goal_does_not_block_other_goals_or_the_write() {
        let h = Harness::new();
        let broken = create_electricity_goal(&h, dec!(500)).await;
        let healthy = create_electricity_goal(&h, dec!(40)).await;
        h.goal_repository
            .failing_goal_ids
            .lock()
            .unwrap()
            .insert(broken.clone());

        let created = h
            .carbon_service
            .record_activities(USER, day(2025, 6, 1), &activities(&[("electricity", dec!(50))]))
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(h.goal_repository.goal(&healthy).status, GoalStatus::Completed);
        assert_eq!(h.goal_repository.goal(&broken).current_value, Decimal::ZERO);

        let report = h.reconciler.reconcile_user_goals(USER).await.unwrap();
        assert_eq!(report.failed_goal_ids, vec![broken]);
    }

    #[tokio::test]
    async fn test_notification_outage_does_not_fail_ledger_write() {
        let h = Harness::new();
        let goal_id = create_electricity_goal(&h, dec!(40)).await;
        *h.notification_repository.fail_inserts.lock().unwrap() = true;

        let created = h
            .carbon_service
            .record_activities(USER, day(2025, 6, 1), &activities(&[("electricity", dec!(50))]))
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(h.goal_repository.goal(&goal_id).status, GoalStatus::Completed);
        assert!(h.achievement_alerts(USER).is_empty());
    }

    #[tokio::test]
    async fn test_failed_append_skips_reconciliation() {
        let h = Harness::new();
        let goal_id = create_electricity_goal(&h, dec!(40)).await;
        *h.carbon_repository.fail_appends.lock().unwrap() = true;

        let result = h
            .carbon_service
            .record_activities(USER, day(2025, 6, 1), &activities(&[("electricity", dec!(50))]))
            .await;

        assert!(result.is_err());
        let goal = h.goal_repository.goal(&goal_id);
        assert_eq!(goal.status, GoalStatus::Pending);
        assert_eq!(goal.current_value, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_disabled_achievement_alerts_still_complete_goal() {
        let h = Harness::new();
        h.notification_service
            .save_settings(
                USER,
                NotificationSettingsUpdate {
                    achievement_alerts: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let goal_id = create_electricity_goal(&h, dec!(40)).await;

        h.carbon_service
            .record_activities(USER, day(2025, 6, 1), &activities(&[("electricity", dec!(50))]))
            .await
            .unwrap();

        assert_eq!(h.goal_repository.goal(&goal_id).status, GoalStatus::Completed);
        assert!(h.achievement_alerts(USER).is_empty());
        assert_eq!(h.goal_service.get_achievements(USER).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_other_categories_do_not_feed_goal() {
        let h = Harness::new();
        let goal_id = create_electricity_goal(&h, dec!(40)).await;

        h.carbon_service
            .record_activities(
                USER,
                day(2025, 6, 1),
                &activities(&[("beef", dec!(5)), ("petrol", dec!(30))]),
            )
            .await
            .unwrap();

        let goal = h.goal_repository.goal(&goal_id);
        assert_eq!(goal.current_value, Decimal::ZERO);
        assert_eq!(goal.status, GoalStatus::Pending);
    }

    #[tokio::test]
    async fn test_summary_windows_and_zero_filled_series() {
        let h = Harness::new();
        let reference = day(2025, 6, 30);
        for (d, kwh) in [(30, dec!(10)), (25, dec!(20)), (10, dec!(100)), (1, dec!(1000))] {
            h.carbon_service
                .record_activities(USER, day(2025, 6, d), &activities(&[("electricity", kwh)]))
                .await
                .unwrap();
        }
        h.carbon_service
            .record_activities(USER, day(2025, 5, 31), &activities(&[("waste", dec!(7))]))
            .await
            .unwrap();

        let summary = h.carbon_service.get_summary(USER, reference).unwrap();

        assert_eq!(summary.today, dec!(8.20));
        assert_eq!(summary.weekly, dec!(24.60));
        // Jun 1..=Jun 30; May 31 is outside the 30-day window.
        assert_eq!(summary.monthly, dec!(926.60));
        assert_eq!(
            summary.by_category.get(&EmissionCategory::Electricity),
            Some(&dec!(926.60))
        );
        assert!(!summary.by_category.contains_key(&EmissionCategory::Waste));
        assert_eq!(summary.daily.len(), 30);
        assert_eq!(summary.daily.first().unwrap().date, day(2025, 6, 1));
        assert_eq!(summary.daily.last().unwrap().co2_amount, dec!(8.20));
        assert!(summary.daily[1].co2_amount.is_zero());
    }

    fn food_goal() -> NewGoal {
        NewGoal {
            title: "Eat less meat".to_string(),
            category: Some(GoalCategory::Food),
            ..electricity_goal(dec!(1000))
        }
    }

    #[tokio::test]
    async fn test_oversized_quantities_rejected_before_totals_can_overflow() {
        let h = Harness::new();
        let goal = h
            .goal_service
            .create_goal(USER, food_goal(), day(2025, 6, 1))
            .await
            .unwrap();
        let huge = Decimal::from_i128_with_scale(10i128.pow(27), 0);

        for _ in 0..3 {
            let err = h
                .carbon_service
                .record_activities(USER, day(2025, 6, 1), &activities(&[("beef", huge)]))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                Error::Carbon(CarbonError::InvalidQuantity { .. })
            ));
        }

        assert!(h.carbon_repository.entries.lock().unwrap().is_empty());
        assert!(h.carbon_service.get_summary(USER, day(2025, 6, 1)).is_ok());
        assert_eq!(h.goal_repository.goal(&goal.id).status, GoalStatus::Pending);
    }

    #[tokio::test]
    async fn test_large_entries_below_the_cap_still_reconcile() {
        let h = Harness::new();
        let goal = h
            .goal_service
            .create_goal(USER, food_goal(), day(2025, 6, 1))
            .await
            .unwrap();

        // 37M kg of beef is 999M kg CO2, just under the per-entry cap.
        for _ in 0..3 {
            h.carbon_service
                .record_activities(USER, day(2025, 6, 1), &activities(&[("beef", dec!(37000000))]))
                .await
                .unwrap();
        }

        let goal = h.goal_repository.goal(&goal.id);
        assert_eq!(goal.current_value, dec!(2997000000.00));
        assert_eq!(goal.status, GoalStatus::Completed);
    }

    #[tokio::test]
    async fn test_overflowing_stored_totals_are_errors_not_panics() {
        let h = Harness::new();
        let goal = h
            .goal_service
            .create_goal(USER, food_goal(), day(2025, 6, 1))
            .await
            .unwrap();
        let created = h
            .carbon_service
            .record_activities(USER, day(2025, 6, 1), &activities(&[("beef", dec!(1))]))
            .await
            .unwrap();
        // Rows written before the per-entry cap existed.
        let legacy = CarbonEntry {
            co2_amount: Decimal::MAX,
            ..created[0].clone()
        };
        h.carbon_repository
            .entries
            .lock()
            .unwrap()
            .extend([legacy.clone(), legacy]);

        let err = h.carbon_service.get_summary(USER, day(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, Error::Carbon(CarbonError::TotalOverflow)));

        let report = h.reconciler.reconcile_user_goals(USER).await.unwrap();
        assert_eq!(report.failed_goal_ids, vec![goal.id]);
    }

    /// Holds reconciliation until released, then reports completion.
    struct GatedReconciler {
        inner: Arc<GoalReconciler>,
        release: Notify,
        finished: Notify,
    }

    #[async_trait]
    impl GoalReconcilerTrait for GatedReconciler {
        async fn reconcile_user_goals(&self, user_id: &str) -> Result<ReconciliationReport> {
            self.release.notified().await;
            let report = self.inner.reconcile_user_goals(user_id).await;
            self.finished.notify_one();
            report
        }

        async fn announce_completion(&self, goal: &Goal) {
            self.inner.announce_completion(goal).await
        }
    }

    #[tokio::test]
    async fn test_dropped_caller_does_not_skip_reconciliation() {
        let h = Harness::new();
        let goal_id = create_electricity_goal(&h, dec!(50)).await;
        let gate = Arc::new(GatedReconciler {
            inner: h.reconciler.clone(),
            release: Notify::new(),
            finished: Notify::new(),
        });
        let service = CarbonService::new(h.carbon_repository.clone(), gate.clone());

        let batch = activities(&[("electricity", dec!(100))]);
        let request = service.record_activities(USER, day(2025, 6, 1), &batch);
        let timed_out = tokio::time::timeout(Duration::from_millis(50), request).await;
        assert!(timed_out.is_err());
        assert_eq!(h.carbon_repository.entries.lock().unwrap().len(), 1);
        assert_eq!(h.goal_repository.goal(&goal_id).status, GoalStatus::Pending);

        gate.release.notify_one();
        tokio::time::timeout(Duration::from_secs(5), gate.finished.notified())
            .await
            .unwrap();

        assert_eq!(h.goal_repository.goal(&goal_id).status, GoalStatus::Completed);
        assert_eq!(h.goal_service.get_achievements(USER).unwrap().len(), 1);
    }
}
