//! SQLite storage implementation for notifications and notification settings.

mod model;
mod repository;


pub use model::{NewNotificationDB, NotificationDB, NotificationSettingsDB};
pub use repository::NotificationRepository;
