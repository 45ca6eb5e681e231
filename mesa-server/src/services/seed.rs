//! Sample data for development databases
//!
//! Runs at startup after migrations when `SEED_SAMPLE_DATA` is set. Only an
//! empty menu is seeded, so restarts never duplicate rows.

use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, dining_table, menu_item};
use shared::models::{DiningTableCreate, MenuItemCreate};

const SAMPLE_LOCATION: &str = "main";

fn item(name: &str, category: &str, price: i64, minutes: i32, labels: &[&str]) -> MenuItemCreate {
    MenuItemCreate {
        name: name.to_string(),
        description: None,
        price,
        category: category.to_string(),
        is_available: Some(true),
        preparation_time: Some(minutes),
        customizations: Some(labels.iter().map(|l| l.to_string()).collect()),
    }
}

fn sample_menu() -> Vec<MenuItemCreate> {
    vec![
        item("Patatas bravas", "starters", 650, 10, &["extra alioli"]),
        item("Croquetas de jamón", "starters", 750, 8, &[]),
        item("Paella valenciana", "mains", 1650, 30, &["sin pimiento"]),
        item("Tortilla de patatas", "mains", 900, 15, &["con cebolla", "sin cebolla"]),
        item("Crema catalana", "desserts", 550, 5, &[]),
        item("Agua mineral", "drinks", 200, 0, &["con gas"]),
    ]
}

/// `(table_number, seats)`
const SAMPLE_TABLES: [(i32, i32); 4] = [(1, 2), (2, 2), (3, 4), (4, 6)];

/// Seed the sample menu and tables if the menu is empty
///
/// Returns whether anything was written.
pub async fn seed_if_empty(pool: &SqlitePool, now: i64) -> RepoResult<bool> {
    if menu_item::count(pool).await? > 0 {
        tracing::debug!("Menu already populated, skipping sample data");
        return Ok(false);
    }

    let mut tx = pool.begin().await?;
    let menu = sample_menu();
    for item in &menu {
        menu_item::create(&mut *tx, item, now).await?;
    }
    for (table_number, seats) in SAMPLE_TABLES {
        let table = DiningTableCreate {
            location_id: SAMPLE_LOCATION.to_string(),
            table_number,
            seats,
        };
        // Tables may survive a manual menu wipe
        if dining_table::find_by_number(&mut *tx, SAMPLE_LOCATION, table_number, None)
            .await?
            .is_none()
        {
            dining_table::create(&mut *tx, &table, now).await?;
        }
    }
    tx.commit().await?;

    tracing::info!(
        menu_items = menu.len(),
        tables = SAMPLE_TABLES.len(),
        "Sample data seeded"
    );
    Ok(true)
}

/// Startup hook: seeding problems are logged, never fatal
pub async fn seed_sample_data(pool: &SqlitePool, now: i64) {
    if let Err(e) = seed_if_empty(pool, now).await {
        tracing::warn!(error = %e, "Failed to seed sample data, continuing without it");
    }
}
