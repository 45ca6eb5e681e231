//! Menu Item Repository

use super::RepoResult;
use shared::models::{MenuFilter, MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::SqliteExecutor;
use sqlx::types::Json;

const COLUMNS: &str = "id, name, description, price, category, is_available, preparation_time, \
                       customizations, created_at, updated_at";

/// Items ordered by category then name
pub async fn find_all(exec: impl SqliteExecutor<'_>, filter: &MenuFilter) -> RepoResult<Vec<MenuItem>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM menu_item \
         WHERE (?1 IS NULL OR category = ?1) AND (?2 = 0 OR is_available = 1) \
         ORDER BY category, name, id"
    );
    let items = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(filter.category.as_deref())
        .bind(filter.available.unwrap_or(false))
        .fetch_all(exec)
        .await?;
    Ok(items)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_item WHERE id = ?");
    let item = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(item)
}

pub async fn count(exec: impl SqliteExecutor<'_>) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM menu_item")
        .fetch_one(exec)
        .await?;
    Ok(count)
}

pub async fn create(exec: impl SqliteExecutor<'_>, data: &MenuItemCreate, now: i64) -> RepoResult<MenuItem> {
    let sql = format!(
        "INSERT INTO menu_item (name, description, price, category, is_available, preparation_time, \
         customizations, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let customizations = data.customizations.clone().unwrap_or_default();
    let item = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(data.name.trim())
        .bind(&data.description)
        .bind(data.price)
        .bind(data.category.trim())
        .bind(data.is_available.unwrap_or(true))
        .bind(data.preparation_time.unwrap_or(0))
        .bind(Json(customizations))
        .bind(now)
        .bind(now)
        .fetch_one(exec)
        .await?;
    Ok(item)
}

/// Patch the given fields; `None` when the row does not exist
pub async fn update(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    data: &MenuItemUpdate,
    now: i64,
) -> RepoResult<Option<MenuItem>> {
    let sql = format!(
        "UPDATE menu_item SET name = COALESCE(?1, name), description = COALESCE(?2, description), \
         price = COALESCE(?3, price), category = COALESCE(?4, category), \
         is_available = COALESCE(?5, is_available), preparation_time = COALESCE(?6, preparation_time), \
         customizations = COALESCE(?7, customizations), updated_at = ?8 \
         WHERE id = ?9 RETURNING {COLUMNS}"
    );
    let item = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(data.name.as_deref().map(str::trim))
        .bind(&data.description)
        .bind(data.price)
        .bind(data.category.as_deref().map(str::trim))
        .bind(data.is_available)
        .bind(data.preparation_time)
        .bind(data.customizations.clone().map(Json))
        .bind(now)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(item)
}

pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM menu_item WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected() > 0)
}
