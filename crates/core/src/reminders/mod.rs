//! Reminders module - deadline classification and the reminder sweep.

mod deadline_sweeper;
mod reminders_model;
mod reminders_traits;


pub use deadline_sweeper::DeadlineSweeper;
pub use reminders_model::{
    classify_deadline, DeadlineStatus, SweepReport, REMINDER_HORIZON_DAYS,
};
pub use reminders_traits::DeadlineSweeperTrait;
