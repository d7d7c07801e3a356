pub mod pool;
pub mod repos;

// Re-export commonly used items
pub use pool::{create_pool, run_migrations};
pub use repos::account::{AccountRepo, AccountRow, NewAccount};
pub use repos::calendar_event::{CalendarEventRepo, CalendarEventRow, NewCalendarEvent};
pub use repos::client::{ClientFields, ClientRepo, ClientRow};
pub use repos::hosting::{HostingFields, HostingRepo, HostingRow};
pub use repos::notification::{NotificationRepo, NotificationRow};
pub use repos::project::{ProjectFields, ProjectRepo, ProjectRow};
pub use repos::service::{ServiceFields, ServiceRepo, ServiceRow};
pub use repos::user_settings::{SettingsUpdate, UserSettingsRepo, UserSettingsRow};
