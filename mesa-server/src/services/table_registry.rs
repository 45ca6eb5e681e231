//! Table Registry
//!
//! Owns the `(location_id, table_number)` uniqueness rule and table status
//! changes. Uniqueness is checked here and backed by a UNIQUE index, so a
//! racing insert still surfaces as `TableNumberExists`.

use sqlx::SqlitePool;

use crate::core::TableDeletePolicy;
use crate::db::repository::{RepoError, dining_table, order};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_positive, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode, SharedClock};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};

#[derive(Debug, Clone)]
pub struct TableRegistry {
    pool: SqlitePool,
    clock: SharedClock,
    delete_policy: TableDeletePolicy,
}

fn table_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::TableNotFound, format!("Table {id} not found"))
        .with_detail("table_id", id)
}

fn duplicate_table(location_id: &str, table_number: i32) -> AppError {
    AppError::with_message(
        ErrorCode::TableNumberExists,
        format!("Table {table_number} already exists in location '{location_id}'"),
    )
    .with_detail("location_id", location_id)
    .with_detail("table_number", table_number)
}

fn map_duplicate(err: RepoError, location_id: &str, table_number: i32) -> AppError {
    match err {
        RepoError::Duplicate(_) => duplicate_table(location_id, table_number),
        other => other.into(),
    }
}

fn validate_table_fields(location_id: &str, table_number: i32, seats: i32) -> AppResult<()> {
    validate_required_text(location_id, "location_id", MAX_SHORT_TEXT_LEN)?;
    validate_positive(table_number.into(), "table_number")?;
    validate_positive(seats.into(), "seats")?;
    Ok(())
}

impl TableRegistry {
    pub fn new(pool: SqlitePool, clock: SharedClock, delete_policy: TableDeletePolicy) -> Self {
        Self {
            pool,
            clock,
            delete_policy,
        }
    }

    pub fn delete_policy(&self) -> TableDeletePolicy {
        self.delete_policy
    }

    pub async fn list_tables(&self, location: Option<&str>) -> AppResult<Vec<DiningTable>> {
        Ok(dining_table::find_all(&self.pool, location).await?)
    }

    pub async fn get_table(&self, id: i64) -> AppResult<DiningTable> {
        dining_table::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| table_not_found(id))
    }

    /// Insert a new `available` table; `TableNumberExists` if the pair is taken
    pub async fn create_table(&self, input: DiningTableCreate) -> AppResult<DiningTable> {
        validate_table_fields(&input.location_id, input.table_number, input.seats)?;
        let location_id = input.location_id.trim();

        if dining_table::find_by_number(&self.pool, location_id, input.table_number, None)
            .await?
            .is_some()
        {
            return Err(duplicate_table(location_id, input.table_number));
        }

        let table = dining_table::create(&self.pool, &input, self.clock.now_millis())
            .await
            .map_err(|e| map_duplicate(e, location_id, input.table_number))?;

        tracing::info!(
            table_id = table.id,
            location_id = %table.location_id,
            table_number = table.table_number,
            "Table created"
        );
        Ok(table)
    }

    /// Apply a partial update, re-checking uniqueness when the identity changes
    pub async fn update_table(&self, id: i64, patch: DiningTableUpdate) -> AppResult<DiningTable> {
        let mut table = self.get_table(id).await?;

        if let Some(location_id) = &patch.location_id {
            table.location_id = location_id.trim().to_string();
        }
        if let Some(table_number) = patch.table_number {
            table.table_number = table_number;
        }
        if let Some(seats) = patch.seats {
            table.seats = seats;
        }
        if let Some(status) = patch.status {
            table.status = status;
        }
        validate_table_fields(&table.location_id, table.table_number, table.seats)?;

        if patch.changes_identity()
            && dining_table::find_by_number(&self.pool, &table.location_id, table.table_number, Some(id))
                .await?
                .is_some()
        {
            return Err(duplicate_table(&table.location_id, table.table_number));
        }

        let saved = dining_table::save(&self.pool, &table)
            .await
            .map_err(|e| map_duplicate(e, &table.location_id, table.table_number))?
            .ok_or_else(|| table_not_found(id))?;

        tracing::info!(table_id = id, "Table updated");
        Ok(saved)
    }

    /// Set the status; any status may follow any other
    pub async fn update_table_status(&self, id: i64, status: &str) -> AppResult<DiningTable> {
        let status: TableStatus = status.parse()?;
        let table = dining_table::set_status(&self.pool, id, status)
            .await?
            .ok_or_else(|| table_not_found(id))?;
        tracing::info!(table_id = id, status = %status, "Table status changed");
        Ok(table)
    }

    /// Delete a table, applying the configured policy to active orders on it
    pub async fn delete_table(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        if dining_table::find_by_id(&mut *tx, id).await?.is_none() {
            return Err(table_not_found(id));
        }

        let active = order::count_active_for_table(&mut *tx, id).await?;
        if active > 0 {
            match self.delete_policy {
                TableDeletePolicy::Reject => {
                    return Err(AppError::with_message(
                        ErrorCode::TableInUse,
                        format!("Table {id} has {active} active order(s)"),
                    )
                    .with_detail("table_id", id)
                    .with_detail("active_orders", active));
                }
                TableDeletePolicy::Cascade => {
                    let detached =
                        order::detach_active_from_table(&mut *tx, id, self.clock.now_millis()).await?;
                    tracing::info!(table_id = id, detached, "Detached active orders from table");
                }
                TableDeletePolicy::AllowOrphan => {
                    tracing::warn!(table_id = id, active, "Deleting table with active orders");
                }
            }
        }

        dining_table::delete(&mut *tx, id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(table_id = id, policy = %self.delete_policy, "Table deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::order::NewOrder;
    use crate::db::repository::test_support::test_pool;
    use crate::utils::ManualClock;
    use shared::models::{OrderStatus, OrderType, PaymentStatus};
    use std::sync::Arc;

    async fn registry(policy: TableDeletePolicy) -> TableRegistry {
        TableRegistry::new(test_pool().await, Arc::new(ManualClock::new(1_000)), policy)
    }

    fn input(location: &str, number: i32) -> DiningTableCreate {
        DiningTableCreate {
            location_id: location.into(),
            table_number: number,
            seats: 4,
        }
    }

    async fn active_order_on(registry: &TableRegistry, table_id: i64) -> i64 {
        let new = NewOrder {
            customer_name: "Ana",
            customer_phone: "600000000",
            customer_email: None,
            order_type: OrderType::DineIn,
            location_id: "centro",
            table_id: Some(table_id),
            total_amount: 1000,
            payment_method: "cash",
            payment_status: PaymentStatus::Pending,
            delivery_address: None,
            notes: None,
            now: 1_000,
        };
        order::insert(&registry.pool, &new).await.unwrap().id
    }

    #[tokio::test]
    async fn test_duplicate_table_number_rejected() {
        let registry = registry(TableDeletePolicy::Reject).await;
        registry.create_table(input("L1", 5)).await.unwrap();

        let err = registry.create_table(input("L1", 5)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNumberExists);
        assert_eq!(registry.list_tables(Some("L1")).await.unwrap().len(), 1);

        registry.create_table(input("L2", 5)).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_validation() {
        let registry = registry(TableDeletePolicy::Reject).await;
        let cases = [
            (input("", 1), ErrorCode::RequiredField),
            (input("L1", 0), ErrorCode::ValueOutOfRange),
            (DiningTableCreate { seats: 0, ..input("L1", 1) }, ErrorCode::ValueOutOfRange),
        ];
        for (bad, expected) in cases {
            let err = registry.create_table(bad).await.unwrap_err();
            assert_eq!(err.code, expected);
        }
    }

    #[tokio::test]
    async fn test_update_revalidates_uniqueness() {
        let registry = registry(TableDeletePolicy::Reject).await;
        registry.create_table(input("L1", 1)).await.unwrap();
        let second = registry.create_table(input("L1", 2)).await.unwrap();

        let clash = DiningTableUpdate {
            table_number: Some(1),
            ..Default::default()
        };
        let err = registry.update_table(second.id, clash).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNumberExists);

        // Keeping its own number is not a clash
        let same = DiningTableUpdate {
            table_number: Some(2),
            seats: Some(6),
            ..Default::default()
        };
        let updated = registry.update_table(second.id, same).await.unwrap();
        assert_eq!(updated.seats, 6);

        let moved = DiningTableUpdate {
            location_id: Some("L2".into()),
            table_number: Some(1),
            ..Default::default()
        };
        let updated = registry.update_table(second.id, moved).await.unwrap();
        assert_eq!((updated.location_id.as_str(), updated.table_number), ("L2", 1));

        let err = registry
            .update_table(999, DiningTableUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);
    }

    #[tokio::test]
    async fn test_status_is_permissive() {
        let registry = registry(TableDeletePolicy::Reject).await;
        let table = registry.create_table(input("L1", 1)).await.unwrap();

        for status in ["maintenance", "occupied", "reserved", "available", "occupied"] {
            let t = registry.update_table_status(table.id, status).await.unwrap();
            assert_eq!(t.status.as_str(), status);
        }

        let err = registry.update_table_status(table.id, "broken").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTableStatus);
        let err = registry.update_table_status(999, "available").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);
    }

    #[tokio::test]
    async fn test_delete_reject_policy() {
        let registry = registry(TableDeletePolicy::Reject).await;
        let table = registry.create_table(input("L1", 1)).await.unwrap();
        active_order_on(&registry, table.id).await;

        let err = registry.delete_table(table.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableInUse);
        assert!(registry.get_table(table.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_cascade_policy_detaches_orders() {
        let registry = registry(TableDeletePolicy::Cascade).await;
        let table = registry.create_table(input("L1", 1)).await.unwrap();
        let order_id = active_order_on(&registry, table.id).await;

        registry.delete_table(table.id).await.unwrap();
        assert_eq!(
            registry.get_table(table.id).await.unwrap_err().code,
            ErrorCode::TableNotFound
        );
        let order = order::find_by_id(&registry.pool, order_id).await.unwrap().unwrap();
        assert_eq!(order.table_id, None);
    }

    #[tokio::test]
    async fn test_delete_allow_orphan_policy_keeps_reference() {
        let registry = registry(TableDeletePolicy::AllowOrphan).await;
        let table = registry.create_table(input("L1", 1)).await.unwrap();
        let order_id = active_order_on(&registry, table.id).await;

        registry.delete_table(table.id).await.unwrap();
        let order = order::find_by_id(&registry.pool, order_id).await.unwrap().unwrap();
        assert_eq!(order.table_id, Some(table.id));
    }

    #[tokio::test]
    async fn test_delete_ignores_finished_orders() {
        let registry = registry(TableDeletePolicy::Reject).await;
        let table = registry.create_table(input("L1", 1)).await.unwrap();
        let order_id = active_order_on(&registry, table.id).await;
        order::update_status(&registry.pool, order_id, OrderStatus::Delivered, 2_000)
            .await
            .unwrap();

        registry.delete_table(table.id).await.unwrap();
        let err = registry.delete_table(table.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);
    }
}
