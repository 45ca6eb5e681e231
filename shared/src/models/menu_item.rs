//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Price in minor currency units (cents)
    pub price: i64,
    pub category: String,
    pub is_available: bool,
    /// Preparation time in minutes
    pub preparation_time: i32,
    /// Customization labels offered for this item (e.g. "sin cebolla")
    #[cfg_attr(feature = "db", sqlx(json))]
    pub customizations: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category: String,
    pub is_available: Option<bool>,
    pub preparation_time: Option<i32>,
    pub customizations: Option<Vec<String>>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
    pub preparation_time: Option<i32>,
    pub customizations: Option<Vec<String>>,
}

/// Menu listing filter (`GET /api/menu?category=&available=`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuFilter {
    pub category: Option<String>,
    /// `true` hides items marked unavailable
    pub available: Option<bool>,
}
