//! Deadline classification and sweep reporting.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::notifications::ReminderBucket;

/// Widest reminder window, in days before the deadline.
pub const REMINDER_HORIZON_DAYS: i64 = 3;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Where a pending goal sits relative to its deadline at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineStatus {
    pub bucket: ReminderBucket,
    /// Days left for the 1-day and 3-day buckets, days overdue for the overdue bucket.
    pub days: i64,
}

fn ceil_days(span: Duration) -> i64 {
    let millis = span.num_milliseconds();
    (millis + MILLIS_PER_DAY - 1).div_euclid(MILLIS_PER_DAY)
}

/// Classifies a deadline. The deadline instant is midnight UTC at the start of `deadline`.
pub fn classify_deadline(deadline: NaiveDate, now: DateTime<Utc>) -> Option<DeadlineStatus> {
    let deadline_at = deadline.and_time(chrono::NaiveTime::MIN).and_utc();

    if now > deadline_at {
        return Some(DeadlineStatus {
            bucket: ReminderBucket::Overdue,
            days: ceil_days(now - deadline_at),
        });
    }

    let days_left = ceil_days(deadline_at - now);
    let bucket = if days_left <= 1 {
        ReminderBucket::OneDay
    } else if days_left <= REMINDER_HORIZON_DAYS {
        ReminderBucket::ThreeDay
    } else {
        return None;
    };
    Some(DeadlineStatus {
        bucket,
        days: days_left,
    })
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Set when another sweep was still running and this one did nothing.
    pub skipped_overlapping: bool,
    pub goals_scanned: usize,
    pub reminders_sent: usize,
    pub suppressed: usize,
    pub failures: usize,
}
