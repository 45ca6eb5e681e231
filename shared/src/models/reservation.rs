//! Reservation Model

use serde::{Deserialize, Serialize};

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Time of day, `HH:MM`
    pub time: String,
    pub guests: i32,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Create reservation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date: String,
    pub time: String,
    pub guests: i32,
    pub notes: Option<String>,
}

/// Availability query (`GET /api/availability?date=&time=`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Availability of one slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Availability {
    pub date: String,
    pub time: String,
    pub available: bool,
    /// Answer served from the availability cache
    pub from_cache: bool,
}
