//! Contact messages from the public site

use sqlx::SqlitePool;

use crate::db::repository::contact;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_MESSAGE_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, SharedClock};
use shared::models::{Contact, ContactCreate};

#[derive(Debug, Clone)]
pub struct ContactService {
    pool: SqlitePool,
    clock: SharedClock,
}

impl ContactService {
    pub fn new(pool: SqlitePool, clock: SharedClock) -> Self {
        Self { pool, clock }
    }

    pub async fn create_contact(&self, input: ContactCreate) -> AppResult<Contact> {
        validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&input.email, "email", MAX_EMAIL_LEN)?;
        if !input.email.contains('@') {
            return Err(AppError::invalid_field("email", "email must be an email address"));
        }
        validate_optional_text(&input.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&input.message, "message", MAX_MESSAGE_LEN)?;

        let created = contact::create(&self.pool, &input, self.clock.now_millis()).await?;
        tracing::info!(contact_id = created.id, "Contact message received");
        Ok(created)
    }

    /// Messages newest first
    pub async fn list_contacts(&self) -> AppResult<Vec<Contact>> {
        Ok(contact::find_all(&self.pool).await?)
    }
}
