//! Reservation Repository

use super::RepoResult;
use shared::models::{Reservation, ReservationCreate};
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, name, phone, email, date, time, guests, notes, created_at";

pub async fn create(exec: impl SqliteExecutor<'_>, data: &ReservationCreate, now: i64) -> RepoResult<Reservation> {
    let sql = format!(
        "INSERT INTO reservation (name, phone, email, date, time, guests, notes, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let reservation = sqlx::query_as::<_, Reservation>(&sql)
        .bind(data.name.trim())
        .bind(data.phone.trim())
        .bind(&data.email)
        .bind(&data.date)
        .bind(&data.time)
        .bind(data.guests)
        .bind(&data.notes)
        .bind(now)
        .fetch_one(exec)
        .await?;
    Ok(reservation)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Reservation>> {
    let sql = format!("SELECT {COLUMNS} FROM reservation WHERE id = ?");
    let reservation = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(reservation)
}

/// All reservations, newest first
pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<Reservation>> {
    let sql = format!("SELECT {COLUMNS} FROM reservation ORDER BY created_at DESC, id DESC");
    let reservations = sqlx::query_as::<_, Reservation>(&sql).fetch_all(exec).await?;
    Ok(reservations)
}

/// Reservations of one day, by time
pub async fn find_by_date(exec: impl SqliteExecutor<'_>, date: &str) -> RepoResult<Vec<Reservation>> {
    let sql = format!("SELECT {COLUMNS} FROM reservation WHERE date = ? ORDER BY time, id");
    let reservations = sqlx::query_as::<_, Reservation>(&sql)
        .bind(date)
        .fetch_all(exec)
        .await?;
    Ok(reservations)
}

/// Reservations booked for exactly `(date, time)`
pub async fn count_for_slot(exec: impl SqliteExecutor<'_>, date: &str, time: &str) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reservation WHERE date = ? AND time = ?",
    )
    .bind(date)
    .bind(time)
    .fetch_one(exec)
    .await?;
    Ok(count)
}

pub async fn count_by_date(exec: impl SqliteExecutor<'_>, date: &str) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reservation WHERE date = ?")
        .bind(date)
        .fetch_one(exec)
        .await?;
    Ok(count)
}

/// Delete and return the removed row
pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Reservation>> {
    let sql = format!("DELETE FROM reservation WHERE id = ? RETURNING {COLUMNS}");
    let removed = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn booking(date: &str, time: &str) -> ReservationCreate {
        ReservationCreate {
            name: "Pablo".into(),
            phone: "611000111".into(),
            date: date.into(),
            time: time.into(),
            guests: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_slot_counts() {
        let pool = test_pool().await;
        create(&pool, &booking("2025-06-01", "19:00"), 1).await.unwrap();
        create(&pool, &booking("2025-06-01", "21:00"), 2).await.unwrap();
        create(&pool, &booking("2025-06-02", "19:00"), 3).await.unwrap();

        assert_eq!(count_for_slot(&pool, "2025-06-01", "19:00").await.unwrap(), 1);
        assert_eq!(count_for_slot(&pool, "2025-06-01", "20:00").await.unwrap(), 0);
        assert_eq!(count_by_date(&pool, "2025-06-01").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_orderings() {
        let pool = test_pool().await;
        let late = create(&pool, &booking("2025-06-01", "21:00"), 1).await.unwrap();
        let early = create(&pool, &booking("2025-06-01", "13:30"), 2).await.unwrap();

        let by_date = find_by_date(&pool, "2025-06-01").await.unwrap();
        assert_eq!(by_date.iter().map(|r| r.id).collect::<Vec<_>>(), vec![early.id, late.id]);

        let all = find_all(&pool).await.unwrap();
        assert_eq!(all[0].id, early.id);
    }

    #[tokio::test]
    async fn test_delete_returns_row() {
        let pool = test_pool().await;
        let r = create(&pool, &booking("2025-06-01", "19:00"), 1).await.unwrap();
        let removed = delete(&pool, r.id).await.unwrap().unwrap();
        assert_eq!(removed.time, "19:00");
        assert!(delete(&pool, r.id).await.unwrap().is_none());
        assert!(find_by_id(&pool, r.id).await.unwrap().is_none());
    }
}
