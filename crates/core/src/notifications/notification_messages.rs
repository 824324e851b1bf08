//! User-facing notification text.

use rust_decimal::Decimal;

use crate::goals::Goal;

pub fn achievement_message(goal_title: &str) -> String {
    format!("Congratulations! You achieved your goal: \"{}\"", goal_title)
}

pub fn one_day_reminder_message(goal: &Goal) -> String {
    format!(
        "Deadline tomorrow! Your goal \"{}\" is due tomorrow. Current progress: {}/{} {}",
        goal.title,
        goal.current_value.normalize(),
        goal.target_value.normalize(),
        goal.unit
    )
}

pub fn three_day_reminder_message(goal: &Goal, days_left: i64) -> String {
    format!(
        "Deadline approaching: your goal \"{}\" is due in {} days. Keep going!",
        goal.title, days_left
    )
}

pub fn overdue_reminder_message(goal: &Goal, days_overdue: i64) -> String {
    format!(
        "Goal overdue: \"{}\" was due {} day(s) ago. Progress: {}/{} {}",
        goal.title,
        days_overdue,
        goal.current_value.normalize(),
        goal.target_value.normalize(),
        goal.unit
    )
}

pub fn business_alert_message(organization_name: &str, weekly_limit: Decimal) -> String {
    format!(
        "Message from {}: You have exceeded the recommended weekly carbon footprint limit of {} kg CO2. Please review your carbon usage.",
        organization_name,
        weekly_limit.normalize()
    )
}

/// True when the message carries a placeholder left by a missing value.
///
/// `undefined` matches anywhere, ignoring case; `NaN` and `null` must appear as whole words.
pub fn is_malformed_message(message: &str) -> bool {
    if message.to_lowercase().contains("undefined") {
        return true;
    }
    message
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == "NaN" || word == "null")
}
