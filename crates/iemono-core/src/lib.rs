// Core inventory logic - the expiry engine and everything it feeds
pub mod alerts;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod expiry;
pub mod inventory;
pub mod models;
pub mod store;
pub mod view;

#[cfg(test)]
mod testing;

pub use alerts::{alert_items, alert_summary, AlertEntry, AlertSummary};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use dashboard::{dashboard_stats, timeline, DashboardStats, TimelineEntry};
pub use error::Error;
pub use expiry::{
    classify, days_until, effective_alert_days, format_label, format_short_label, AlertDaysSource,
    ClassifyOptions, ExpiryContext, ExpiryStatus,
};
pub use inventory::Inventory;
pub use models::{Category, Item, ItemDraft, Location, Settings, Theme};
pub use store::{ItemStore, MemoryStore, SettingsStore};
pub use view::{view, Filter, SortKey, ViewQuery};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
