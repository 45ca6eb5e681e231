//! Slot availability lookups, memoized in the availability cache

use sqlx::SqlitePool;

use crate::cache::{TtlCache, slot_key};
use crate::db::repository::reservation;
use crate::utils::AppResult;
use crate::utils::validation::{validate_date, validate_time};
use shared::models::Availability;

/// Answers "is this slot free?" from the cache or a reservation count
///
/// Lookups take no lock: two concurrent checks for a free slot both see it
/// as available.
#[derive(Debug, Clone)]
pub struct AvailabilityChecker {
    pool: SqlitePool,
    cache: TtlCache<bool>,
}

impl AvailabilityChecker {
    pub fn new(pool: SqlitePool, cache: TtlCache<bool>) -> Self {
        Self { pool, cache }
    }

    pub async fn check_availability(&self, date: &str, time: &str) -> AppResult<Availability> {
        validate_date(date, "date")?;
        validate_time(time, "time")?;

        let key = slot_key(date, time);
        if let Some(available) = self.cache.get(&key) {
            return Ok(Availability {
                date: date.to_string(),
                time: time.to_string(),
                available,
                from_cache: true,
            });
        }

        let booked = reservation::count_for_slot(&self.pool, date, time).await?;
        let available = booked == 0;
        self.cache.set(key, available);
        tracing::debug!(date, time, booked, "Availability computed");

        Ok(Availability {
            date: date.to_string(),
            time: time.to_string(),
            available,
            from_cache: false,
        })
    }
}
