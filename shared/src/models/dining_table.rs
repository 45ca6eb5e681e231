//! Dining Table Model

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table occupancy status
///
/// Any status may follow any other; the registry does not enforce a
/// transition graph.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

impl TableStatus {
    pub const ALL: [TableStatus; 4] = [
        TableStatus::Available,
        TableStatus::Occupied,
        TableStatus::Reserved,
        TableStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidTableStatus,
                    format!("Invalid table status '{s}'"),
                )
                .with_detail("field", "status")
                .with_detail("allowed", "available, occupied, reserved, maintenance")
            })
    }
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    /// Location (restaurant branch) identifier
    pub location_id: String,
    /// Unique within `location_id`
    pub table_number: i32,
    pub seats: i32,
    pub status: TableStatus,
    pub created_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub location_id: String,
    pub table_number: i32,
    pub seats: i32,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub location_id: Option<String>,
    pub table_number: Option<i32>,
    pub seats: Option<i32>,
    pub status: Option<TableStatus>,
}

impl DiningTableUpdate {
    /// Whether this update touches the `(location_id, table_number)` key
    pub fn changes_identity(&self) -> bool {
        self.location_id.is_some() || self.table_number.is_some()
    }
}
