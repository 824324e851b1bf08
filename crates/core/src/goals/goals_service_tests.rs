#[cfg(test)]
mod tests {
    use crate::carbon::CarbonServiceTrait;
    use crate::errors::Error;
    use crate::goals::{GoalCategory, GoalServiceTrait, GoalStatus, NewGoal};
    use crate::test_support::{day, Harness};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    const OWNER: &str = "owner";
    const STRANGER: &str = "stranger";

    fn manual_goal(title: &str, target: Decimal) -> NewGoal {
        NewGoal {
            title: title.to_string(),
            target_value: target,
            current_value: None,
            unit: "trees".to_string(),
            deadline: day(2025, 7, 1),
            category: None,
        }
    }

    fn today() -> chrono::NaiveDate {
        day(2025, 6, 1)
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_goal_without_inserting() {
        let h = Harness::new();
        let err = h
            .goal_service
            .create_goal(
                OWNER,
                NewGoal {
                    deadline: day(2025, 5, 31),
                    ..manual_goal("Plant trees", dec!(10))
                },
                today(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(h.goal_service.get_goals(OWNER).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_manual_goal_keeps_supplied_progress() {
        let h = Harness::new();
        let goal = h
            .goal_service
            .create_goal(
                OWNER,
                NewGoal {
                    current_value: Some(dec!(3)),
                    ..manual_goal("Plant trees", dec!(10))
                },
                today(),
            )
            .await
            .unwrap();

        assert_eq!(goal.current_value, dec!(3));
        assert_eq!(goal.status, GoalStatus::Pending);
    }

    #[tokio::test]
    async fn test_category_goal_starts_from_all_time_ledger() {
        let h = Harness::new();
        let mut history = BTreeMap::new();
        history.insert("beef".to_string(), dec!(2));
        h.carbon_service
            .record_activities(OWNER, day(2025, 1, 15), &history)
            .await
            .unwrap();

        let goal = h
            .goal_service
            .create_goal(
                OWNER,
                NewGoal {
                    category: Some(GoalCategory::Food),
                    current_value: Some(dec!(999)),
                    unit: "kg CO2".to_string(),
                    ..manual_goal("Eat less beef", dec!(100))
                },
                today(),
            )
            .await
            .unwrap();

        assert_eq!(goal.current_value, dec!(54.00));
        assert_eq!(goal.status, GoalStatus::Pending);
    }

    #[tokio::test]
    async fn test_goals_listed_newest_first_and_scoped_to_owner() {
        let h = Harness::new();
        for title in ["First goal", "Second goal"] {
            h.goal_service
                .create_goal(OWNER, manual_goal(title, dec!(5)), today())
                .await
                .unwrap();
        }
        h.goal_service
            .create_goal(STRANGER, manual_goal("Not mine", dec!(5)), today())
            .await
            .unwrap();

        let titles: Vec<String> = h
            .goal_service
            .get_goals(OWNER)
            .unwrap()
            .into_iter()
            .map(|g| g.title)
            .collect();
        assert_eq!(titles, vec!["Second goal", "First goal"]);
    }

    #[tokio::test]
    async fn test_toggle_is_bidirectional_and_silent() {
        let h = Harness::new();
        let goal = h
            .goal_service
            .create_goal(OWNER, manual_goal("Plant trees", dec!(10)), today())
            .await
            .unwrap();

        let toggled = h.goal_service.toggle_goal(OWNER, &goal.id).await.unwrap();
        assert_eq!(toggled.status, GoalStatus::Completed);
        let toggled = h.goal_service.toggle_goal(OWNER, &goal.id).await.unwrap();
        assert_eq!(toggled.status, GoalStatus::Pending);

        assert!(h.achievement_alerts(OWNER).is_empty());
        assert!(h.goal_service.get_achievements(OWNER).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_check_ownership() {
        let h = Harness::new();
        let goal = h
            .goal_service
            .create_goal(OWNER, manual_goal("Plant trees", dec!(10)), today())
            .await
            .unwrap();

        let err = h.goal_service.toggle_goal(STRANGER, &goal.id).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        let err = h
            .goal_service
            .set_progress(STRANGER, &goal.id, dec!(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        let err = h.goal_service.delete_goal(STRANGER, &goal.id).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));

        let err = h.goal_service.toggle_goal(OWNER, "missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        assert_eq!(h.goal_service.delete_goal(OWNER, &goal.id).await.unwrap(), 1);
        assert!(h.goal_service.get_goals(OWNER).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_progress_rejects_negative_values() {
        let h = Harness::new();
        let goal = h
            .goal_service
            .create_goal(OWNER, manual_goal("Plant trees", dec!(10)), today())
            .await
            .unwrap();

        let err = h
            .goal_service
            .set_progress(OWNER, &goal.id, dec!(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(h.goal_repository.goal(&goal.id).current_value, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_set_progress_rejects_category_goals() {
        let h = Harness::new();
        let goal = h
            .goal_service
            .create_goal(
                OWNER,
                NewGoal {
                    category: Some(GoalCategory::Waste),
                    ..manual_goal("Less landfill", dec!(10))
                },
                today(),
            )
            .await
            .unwrap();

        let err = h
            .goal_service
            .set_progress(OWNER, &goal.id, dec!(20))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_set_progress_auto_completes_once() {
        let h = Harness::new();
        let goal = h
            .goal_service
            .create_goal(OWNER, manual_goal("Plant trees", dec!(10)), today())
            .await
            .unwrap();

        let partial = h.goal_service.set_progress(OWNER, &goal.id, dec!(4)).await.unwrap();
        assert_eq!(partial.status, GoalStatus::Pending);
        assert!(h.achievement_alerts(OWNER).is_empty());

        let done = h.goal_service.set_progress(OWNER, &goal.id, dec!(10)).await.unwrap();
        assert_eq!(done.status, GoalStatus::Completed);
        assert_eq!(done.current_value, dec!(10));

        let more = h.goal_service.set_progress(OWNER, &goal.id, dec!(12)).await.unwrap();
        assert_eq!(more.status, GoalStatus::Completed);
        assert_eq!(more.current_value, dec!(12));

        assert_eq!(h.achievement_alerts(OWNER).len(), 1);
        let achievements = h.goal_service.get_achievements(OWNER).unwrap();
        assert_eq!(achievements.len(), 1);
        assert_eq!(achievements[0].goal_id, goal.id);
    }
}
