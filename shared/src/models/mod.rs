//! Data models
//!
//! Shared between mesa-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis,
//! money is an integer amount of minor currency units.

pub mod contact;
pub mod dashboard;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod reservation;

// Re-exports
pub use contact::*;
pub use dashboard::*;
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use reservation::*;

use serde::{Deserialize, Serialize};

/// Body of the `PATCH .../status` endpoints
///
/// Kept as a plain string so unknown values surface as a typed
/// `InvalidOrderStatus` / `InvalidTableStatus` error instead of a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Response of delete endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub deleted: bool,
    pub id: i64,
}

impl Deleted {
    pub fn new(id: i64) -> Self {
        Self { deleted: true, id }
    }
}
