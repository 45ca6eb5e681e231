//! Contact Repository

use super::RepoResult;
use shared::models::{Contact, ContactCreate};
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, name, email, phone, message, created_at";

pub async fn create(exec: impl SqliteExecutor<'_>, data: &ContactCreate, now: i64) -> RepoResult<Contact> {
    let sql = format!(
        "INSERT INTO contact (name, email, phone, message, created_at) VALUES (?, ?, ?, ?, ?) \
         RETURNING {COLUMNS}"
    );
    let contact = sqlx::query_as::<_, Contact>(&sql)
        .bind(data.name.trim())
        .bind(data.email.trim())
        .bind(&data.phone)
        .bind(&data.message)
        .bind(now)
        .fetch_one(exec)
        .await?;
    Ok(contact)
}

/// Newest first
pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<Contact>> {
    let sql = format!("SELECT {COLUMNS} FROM contact ORDER BY created_at DESC, id DESC");
    let contacts = sqlx::query_as::<_, Contact>(&sql).fetch_all(exec).await?;
    Ok(contacts)
}
