//! Contact API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::{AppJson, AppResult, with_deadline};
use shared::models::{Contact, ContactCreate};

/// POST /api/contacts
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ContactCreate>,
) -> AppResult<Json<Contact>> {
    let contacts = state.contacts.clone();
    let contact = with_deadline(state.config.request_timeout(), async move {
        contacts.create_contact(payload).await
    })
    .await?;
    Ok(Json(contact))
}

/// GET /api/contacts - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Contact>>> {
    let contacts = state.contacts.clone();
    let list = with_deadline(state.config.request_timeout(), async move { contacts.list_contacts().await }).await?;
    Ok(Json(list))
}
