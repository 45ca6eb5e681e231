//! Menu Catalog

use sqlx::SqlitePool;

use crate::db::repository::menu_item;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_non_negative, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, SharedClock};
use shared::models::{MenuFilter, MenuItem, MenuItemCreate, MenuItemUpdate};

#[derive(Debug, Clone)]
pub struct MenuService {
    pool: SqlitePool,
    clock: SharedClock,
}

fn menu_item_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
        .with_detail("menu_item_id", id)
}

fn validate_price(price: i64) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::with_message(
            ErrorCode::MenuItemInvalidPrice,
            "price must not be negative",
        )
        .with_detail("field", "price"));
    }
    Ok(())
}

fn validate_labels(labels: &Option<Vec<String>>) -> AppResult<()> {
    if let Some(labels) = labels {
        for label in labels {
            validate_required_text(label, "customizations", MAX_NAME_LEN)?;
        }
    }
    Ok(())
}

impl MenuService {
    pub fn new(pool: SqlitePool, clock: SharedClock) -> Self {
        Self { pool, clock }
    }

    pub async fn list_menu_items(&self, filter: &MenuFilter) -> AppResult<Vec<MenuItem>> {
        Ok(menu_item::find_all(&self.pool, filter).await?)
    }

    pub async fn get_menu_item(&self, id: i64) -> AppResult<MenuItem> {
        menu_item::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| menu_item_not_found(id))
    }

    pub async fn create_menu_item(&self, input: MenuItemCreate) -> AppResult<MenuItem> {
        validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&input.category, "category", MAX_NAME_LEN)?;
        validate_optional_text(&input.description, "description", MAX_NOTE_LEN)?;
        validate_price(input.price)?;
        if let Some(minutes) = input.preparation_time {
            validate_non_negative(minutes.into(), "preparation_time")?;
        }
        validate_labels(&input.customizations)?;

        let item = menu_item::create(&self.pool, &input, self.clock.now_millis()).await?;
        tracing::info!(menu_item_id = item.id, name = %item.name, "Menu item created");
        Ok(item)
    }

    pub async fn update_menu_item(&self, id: i64, input: MenuItemUpdate) -> AppResult<MenuItem> {
        if let Some(name) = &input.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(category) = &input.category {
            validate_required_text(category, "category", MAX_NAME_LEN)?;
        }
        validate_optional_text(&input.description, "description", MAX_NOTE_LEN)?;
        if let Some(price) = input.price {
            validate_price(price)?;
        }
        if let Some(minutes) = input.preparation_time {
            validate_non_negative(minutes.into(), "preparation_time")?;
        }
        validate_labels(&input.customizations)?;

        let item = menu_item::update(&self.pool, id, &input, self.clock.now_millis())
            .await?
            .ok_or_else(|| menu_item_not_found(id))?;
        tracing::info!(menu_item_id = id, "Menu item updated");
        Ok(item)
    }

    pub async fn delete_menu_item(&self, id: i64) -> AppResult<()> {
        if !menu_item::delete(&self.pool, id).await? {
            return Err(menu_item_not_found(id));
        }
        tracing::info!(menu_item_id = id, "Menu item deleted");
        Ok(())
    }
}
