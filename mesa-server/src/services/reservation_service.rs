//! Reservation Creator
//!
//! Creates and removes reservations and keeps both caches honest: every
//! write drops the availability entry for its slot and the
//! reservations-by-date entry for its date.

use dashmap::DashMap;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::{TtlCache, slot_key};
use crate::core::ReservationSlotPolicy;
use crate::db::repository::reservation;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_date,
    validate_optional_text, validate_positive, validate_required_text, validate_time,
};
use crate::utils::{AppError, AppResult, ErrorCode, SharedClock};
use shared::models::{Reservation, ReservationCreate};

#[derive(Debug, Clone)]
pub struct ReservationService {
    pool: SqlitePool,
    clock: SharedClock,
    slot_policy: ReservationSlotPolicy,
    availability_cache: TtlCache<bool>,
    by_date_cache: TtlCache<Vec<Reservation>>,
    /// One mutex per `date|time`, used under the exclusive slot policy
    slot_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

fn validate_reservation(input: &ReservationCreate) -> AppResult<()> {
    validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&input.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.email, "email", MAX_EMAIL_LEN)?;
    validate_date(&input.date, "date")?;
    validate_time(&input.time, "time")?;
    validate_positive(input.guests.into(), "guests")?;
    validate_optional_text(&input.notes, "notes", MAX_NOTE_LEN)?;
    Ok(())
}

impl ReservationService {
    pub fn new(
        pool: SqlitePool,
        clock: SharedClock,
        slot_policy: ReservationSlotPolicy,
        availability_cache: TtlCache<bool>,
        by_date_cache: TtlCache<Vec<Reservation>>,
    ) -> Self {
        Self {
            pool,
            clock,
            slot_policy,
            availability_cache,
            by_date_cache,
            slot_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn slot_policy(&self) -> ReservationSlotPolicy {
        self.slot_policy
    }

    fn slot_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.slot_locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the slot's mutex once nobody else holds or waits on it
    fn release_slot_lock(&self, key: &str) {
        self.slot_locks.remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
    }

    async fn book_free_slot(&self, input: &ReservationCreate) -> AppResult<Reservation> {
        let booked = reservation::count_for_slot(&self.pool, &input.date, &input.time).await?;
        if booked > 0 {
            return Err(AppError::with_message(
                ErrorCode::ReservationSlotTaken,
                format!("{} at {} is already booked", input.date, input.time),
            )
            .with_detail("date", input.date.as_str())
            .with_detail("time", input.time.as_str()));
        }
        Ok(reservation::create(&self.pool, input, self.clock.now_millis()).await?)
    }

    fn invalidate(&self, date: &str, time: &str) {
        self.availability_cache.delete(&slot_key(date, time));
        self.by_date_cache.delete(date);
    }

    /// Persist a reservation
    ///
    /// Under [`ReservationSlotPolicy::Exclusive`] creations for one slot are
    /// serialized and a second booking fails with `ReservationSlotTaken`.
    /// Under [`ReservationSlotPolicy::Advisory`] nothing stops two bookings
    /// of the same slot.
    pub async fn create_reservation(&self, input: ReservationCreate) -> AppResult<Reservation> {
        validate_reservation(&input)?;
        let key = slot_key(&input.date, &input.time);

        let created = match self.slot_policy {
            ReservationSlotPolicy::Advisory => {
                reservation::create(&self.pool, &input, self.clock.now_millis()).await?
            }
            ReservationSlotPolicy::Exclusive => {
                let lock = self.slot_lock(&key);
                let result = {
                    let _guard = lock.lock().await;
                    self.book_free_slot(&input).await
                };
                drop(lock);
                self.release_slot_lock(&key);
                result?
            }
        };

        self.invalidate(&created.date, &created.time);
        tracing::info!(
            reservation_id = created.id,
            date = %created.date,
            time = %created.time,
            guests = created.guests,
            "Reservation created"
        );
        Ok(created)
    }

    /// All reservations, newest first
    pub async fn list_reservations(&self) -> AppResult<Vec<Reservation>> {
        Ok(reservation::find_all(&self.pool).await?)
    }

    /// Reservations for one date ordered by time, memoized per date
    pub async fn list_by_date(&self, date: &str) -> AppResult<Vec<Reservation>> {
        validate_date(date, "date")?;
        if let Some(cached) = self.by_date_cache.get(date) {
            return Ok(cached);
        }
        let reservations = reservation::find_by_date(&self.pool, date).await?;
        self.by_date_cache.set(date, reservations.clone());
        Ok(reservations)
    }

    pub async fn delete_reservation(&self, id: i64) -> AppResult<Reservation> {
        let deleted = reservation::delete(&self.pool, id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ReservationNotFound,
                format!("Reservation {id} not found"),
            )
            .with_detail("reservation_id", id)
        })?;
        self.invalidate(&deleted.date, &deleted.time);
        tracing::info!(reservation_id = id, date = %deleted.date, time = %deleted.time, "Reservation deleted");
        Ok(deleted)
    }
}
