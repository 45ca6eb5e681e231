//! Contact Message Model

use serde::{Deserialize, Serialize};

/// Contact message left through the public site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: i64,
}

/// Create contact payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}
