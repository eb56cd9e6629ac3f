// SQLite-backed persistence
// One key-value table, the same shape as the browser storage the data used to live in

pub mod error;
pub mod local;

pub use error::StoreError;
pub use local::{LocalStore, ITEMS_KEY, SETTINGS_KEY};
