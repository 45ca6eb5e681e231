//! Dining Table Repository

use super::RepoResult;
use shared::models::{DiningTable, DiningTableCreate, TableStatus};
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, location_id, table_number, seats, status, created_at";

/// Tables ordered by location then number, optionally for one location
pub async fn find_all(exec: impl SqliteExecutor<'_>, location: Option<&str>) -> RepoResult<Vec<DiningTable>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM dining_table WHERE (?1 IS NULL OR location_id = ?1) \
         ORDER BY location_id, table_number"
    );
    let tables = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(location)
        .fetch_all(exec)
        .await?;
    Ok(tables)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<DiningTable>> {
    let sql = format!("SELECT {COLUMNS} FROM dining_table WHERE id = ?");
    let table = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(table)
}

/// Table holding `(location_id, table_number)`, ignoring `exclude_id`
pub async fn find_by_number(
    exec: impl SqliteExecutor<'_>,
    location_id: &str,
    table_number: i32,
    exclude_id: Option<i64>,
) -> RepoResult<Option<DiningTable>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM dining_table \
         WHERE location_id = ? AND table_number = ? AND (?3 IS NULL OR id <> ?3) LIMIT 1"
    );
    let table = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(location_id)
        .bind(table_number)
        .bind(exclude_id)
        .fetch_optional(exec)
        .await?;
    Ok(table)
}

pub async fn create(exec: impl SqliteExecutor<'_>, data: &DiningTableCreate, now: i64) -> RepoResult<DiningTable> {
    let sql = format!(
        "INSERT INTO dining_table (location_id, table_number, seats, status, created_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let table = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(data.location_id.trim())
        .bind(data.table_number)
        .bind(data.seats)
        .bind(TableStatus::Available)
        .bind(now)
        .fetch_one(exec)
        .await?;
    Ok(table)
}

/// Write every mutable column of `table`; `None` when the row is gone
pub async fn save(exec: impl SqliteExecutor<'_>, table: &DiningTable) -> RepoResult<Option<DiningTable>> {
    let sql = format!(
        "UPDATE dining_table SET location_id = ?, table_number = ?, seats = ?, status = ? \
         WHERE id = ? RETURNING {COLUMNS}"
    );
    let saved = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(&table.location_id)
        .bind(table.table_number)
        .bind(table.seats)
        .bind(table.status)
        .bind(table.id)
        .fetch_optional(exec)
        .await?;
    Ok(saved)
}

/// Set the status; `None` when the row does not exist
pub async fn set_status(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    status: TableStatus,
) -> RepoResult<Option<DiningTable>> {
    let sql = format!("UPDATE dining_table SET status = ? WHERE id = ? RETURNING {COLUMNS}");
    let table = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(status)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(table)
}

pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// `(status, count)` pairs for statuses that have at least one table
pub async fn count_by_status(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<(TableStatus, i64)>> {
    let rows = sqlx::query_as::<_, (TableStatus, i64)>(
        "SELECT status, COUNT(*) FROM dining_table GROUP BY status",
    )
    .fetch_all(exec)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::RepoError;
    use crate::db::repository::test_support::test_pool;

    fn table(location: &str, number: i32) -> DiningTableCreate {
        DiningTableCreate {
            location_id: location.into(),
            table_number: number,
            seats: 4,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_available() {
        let pool = test_pool().await;
        let t = create(&pool, &table("centro", 1), 1000).await.unwrap();
        assert_eq!(t.status, TableStatus::Available);
        assert_eq!(t.created_at, 1000);
    }

    #[tokio::test]
    async fn test_unique_index_maps_to_duplicate() {
        let pool = test_pool().await;
        create(&pool, &table("centro", 1), 1000).await.unwrap();
        let err = create(&pool, &table("centro", 1), 1000).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
        // Same number elsewhere is fine
        create(&pool, &table("playa", 1), 1000).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_by_number_excluding_self() {
        let pool = test_pool().await;
        let t = create(&pool, &table("centro", 3), 1000).await.unwrap();
        assert!(find_by_number(&pool, "centro", 3, None).await.unwrap().is_some());
        assert!(find_by_number(&pool, "centro", 3, Some(t.id)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_order_and_status_counts() {
        let pool = test_pool().await;
        create(&pool, &table("playa", 2), 1000).await.unwrap();
        let t = create(&pool, &table("centro", 5), 1000).await.unwrap();
        create(&pool, &table("centro", 1), 1000).await.unwrap();
        set_status(&pool, t.id, TableStatus::Occupied).await.unwrap();

        let all = find_all(&pool, None).await.unwrap();
        let order: Vec<_> = all.iter().map(|t| (t.location_id.as_str(), t.table_number)).collect();
        assert_eq!(order, vec![("centro", 1), ("centro", 5), ("playa", 2)]);

        assert_eq!(find_all(&pool, Some("playa")).await.unwrap().len(), 1);

        let mut counts = count_by_status(&pool).await.unwrap();
        counts.sort_by_key(|(s, _)| s.as_str());
        assert_eq!(counts, vec![(TableStatus::Available, 2), (TableStatus::Occupied, 1)]);
    }

    #[tokio::test]
    async fn test_set_status_missing_row() {
        let pool = test_pool().await;
        assert!(set_status(&pool, 42, TableStatus::Reserved).await.unwrap().is_none());
        assert!(!delete(&pool, 42).await.unwrap());
    }
}
