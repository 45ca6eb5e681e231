//! Kitchen queue and admin summary

use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::db::repository::{RepoError, dining_table, order, reservation};
use crate::utils::validation::validate_date;
use crate::utils::{AppResult, SharedClock};
use shared::models::{DashboardSummary, KitchenQueue, OrderStatus, TableStatus};

#[derive(Debug, Clone)]
pub struct DashboardService {
    pool: SqlitePool,
    clock: SharedClock,
}

impl DashboardService {
    pub fn new(pool: SqlitePool, clock: SharedClock) -> Self {
        Self { pool, clock }
    }

    /// Orders in received/preparing/ready with their items, oldest first
    pub async fn kitchen_queue(&self) -> AppResult<KitchenQueue> {
        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        let orders = order::find_active_details(&mut conn).await?;
        Ok(KitchenQueue { orders })
    }

    /// Counters per status; `date` defaults to today on the server clock
    pub async fn summary(&self, date: Option<&str>) -> AppResult<DashboardSummary> {
        let date = match date {
            Some(date) => {
                validate_date(date, "date")?;
                date.to_string()
            }
            None => self.clock.today(),
        };

        // Every status shows up, zero counts included
        let mut orders_by_status: BTreeMap<String, i64> = OrderStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for (status, count) in order::count_by_status(&self.pool).await? {
            orders_by_status.insert(status.as_str().to_string(), count);
        }

        let mut tables_by_status: BTreeMap<String, i64> = TableStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for (status, count) in dining_table::count_by_status(&self.pool).await? {
            tables_by_status.insert(status.as_str().to_string(), count);
        }

        let reservations_on_date = reservation::count_by_date(&self.pool, &date).await?;

        Ok(DashboardSummary {
            orders_by_status,
            tables_by_status,
            date,
            reservations_on_date,
        })
    }
}
