//! Order Orchestrator
//!
//! Order creation, status changes and deletion, each in a single SQLite
//! transaction together with the table occupancy change it implies:
//!
//! | Operation | Table side effect (dine-in only) |
//! |-----------|----------------------------------|
//! | create | table → `occupied` (missing table rolls everything back) |
//! | status → delivered / cancelled | table → `available` |
//! | delete | table → `available` |

use sqlx::{SqliteConnection, SqlitePool};

use crate::core::OrderTransitionPolicy;
use crate::db::repository::order::NewOrder;
use crate::db::repository::{RepoError, dining_table, order};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN,
    validate_non_negative, validate_optional_text, validate_positive, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, SharedClock};
use shared::models::{
    CreateOrderRequest, Order, OrderCreate, OrderDetail, OrderFilter, OrderItemInput, OrderStatus,
    OrderType, TableStatus,
};

const DEFAULT_PAYMENT_METHOD: &str = "cash";

#[derive(Debug, Clone)]
pub struct OrderService {
    pool: SqlitePool,
    clock: SharedClock,
    transition_policy: OrderTransitionPolicy,
}

fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        .with_detail("order_id", id)
}

fn table_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::TableNotFound, format!("Table {id} not found"))
        .with_detail("table_id", id)
}

/// Field checks and the order type / table invariant; returns the parsed type
fn validate_order(order: &OrderCreate) -> AppResult<OrderType> {
    let order_type: OrderType = order.order_type.trim().parse()?;
    validate_required_text(&order.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_required_text(&order.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&order.customer_email, "customer_email", MAX_EMAIL_LEN)?;
    validate_required_text(&order.location_id, "location_id", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&order.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&order.delivery_address, "delivery_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&order.notes, "notes", MAX_NOTE_LEN)?;

    if let Some(total) = order.total_amount {
        validate_non_negative(total, "total_amount")?;
    }

    match (order_type, order.table_id) {
        (OrderType::DineIn, None) => {
            return Err(AppError::with_message(
                ErrorCode::TableRequired,
                "Dine-in orders require a table_id",
            )
            .with_detail("field", "table_id"));
        }
        (OrderType::Takeout | OrderType::Delivery, Some(_)) => {
            return Err(AppError::with_message(
                ErrorCode::TableRequired,
                format!("{order_type} orders must not reference a table"),
            )
            .with_detail("field", "table_id"));
        }
        _ => {}
    }

    if order_type == OrderType::Delivery
        && order
            .delivery_address
            .as_deref()
            .is_none_or(|a| a.trim().is_empty())
    {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "Delivery orders require a delivery_address",
        )
        .with_detail("field", "delivery_address"));
    }
    Ok(order_type)
}

fn validate_items(items: &[OrderItemInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty).with_detail("field", "items"));
    }
    for (index, item) in items.iter().enumerate() {
        let field = |name: &str| format!("items[{index}].{name}");
        validate_positive(item.menu_item_id, &field("menu_item_id"))?;
        validate_positive(item.quantity.into(), &field("quantity"))?;
        validate_non_negative(item.unit_price, &field("unit_price"))?;
    }
    Ok(())
}

/// Σ quantity × unit_price, or `None` on overflow
fn items_total(items: &[OrderItemInput]) -> Option<i64> {
    items.iter().try_fold(0i64, |acc, item| {
        item.unit_price
            .checked_mul(item.quantity.into())
            .and_then(|line| acc.checked_add(line))
    })
}

async fn set_table_status(
    conn: &mut SqliteConnection,
    table_id: i64,
    status: TableStatus,
) -> AppResult<()> {
    match dining_table::set_status(conn, table_id, status).await? {
        Some(_) => Ok(()),
        None => Err(table_not_found(table_id)),
    }
}

/// Release the table of an order leaving the active set. A table that no
/// longer exists (deleted under the orphan policy) has nothing to release.
///
/// Only call this for an order that still held its table: a delivered or
/// cancelled order already gave it back, and the table may since have been
/// taken by another order.
async fn release_table(conn: &mut SqliteConnection, order: &Order) -> AppResult<()> {
    if let Some(table_id) = order.occupied_table()
        && dining_table::set_status(conn, table_id, TableStatus::Available)
            .await?
            .is_none()
    {
        tracing::warn!(order_id = order.id, table_id, "Order references a missing table");
    }
    Ok(())
}

impl OrderService {
    pub fn new(pool: SqlitePool, clock: SharedClock, transition_policy: OrderTransitionPolicy) -> Self {
        Self {
            pool,
            clock,
            transition_policy,
        }
    }

    pub async fn get_order(&self, id: i64) -> AppResult<OrderDetail> {
        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        order::find_detail(&mut conn, id)
            .await?
            .ok_or_else(|| order_not_found(id))
    }

    /// Orders newest first; `status` must be a known status name
    pub async fn list_orders(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
        let status = filter
            .status
            .as_deref()
            .map(str::parse::<OrderStatus>)
            .transpose()?;
        Ok(order::find_all(&self.pool, status, filter.location.as_deref()).await?)
    }

    /// Create the order and its items; a dine-in order occupies its table
    ///
    /// Everything happens in one transaction: on any failure, including a
    /// missing table, nothing is written.
    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<OrderDetail> {
        let CreateOrderRequest { order: input, items } = request;
        let order_type = validate_order(&input)?;
        validate_items(&items)?;

        let total_amount = match input.total_amount {
            Some(total) => total,
            None => items_total(&items)
                .ok_or_else(|| AppError::out_of_range("items", "Order total is out of range"))?,
        };

        let now = self.clock.now_millis();
        let new_order = NewOrder {
            customer_name: input.customer_name.trim(),
            customer_phone: input.customer_phone.trim(),
            customer_email: input.customer_email.as_deref(),
            order_type,
            location_id: input.location_id.trim(),
            table_id: input.table_id,
            total_amount,
            payment_method: input
                .payment_method
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_PAYMENT_METHOD),
            payment_status: input.payment_status.unwrap_or_default(),
            delivery_address: input.delivery_address.as_deref(),
            notes: input.notes.as_deref(),
            now,
        };

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        let created = order::insert(&mut *tx, &new_order).await?;
        let mut created_items = Vec::with_capacity(items.len());
        for item in &items {
            created_items.push(order::insert_item(&mut *tx, created.id, item).await?);
        }
        if let Some(table_id) = created.occupied_table() {
            set_table_status(&mut tx, table_id, TableStatus::Occupied).await?;
        }

        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id = created.id,
            order_type = %created.order_type,
            table_id = ?created.table_id,
            items = created_items.len(),
            total_amount = created.total_amount,
            "Order created"
        );
        Ok(OrderDetail {
            order: created,
            items: created_items,
        })
    }

    /// Change the status; delivered/cancelled dine-in orders free their table
    pub async fn update_order_status(&self, id: i64, status: &str) -> AppResult<Order> {
        let next: OrderStatus = status.parse()?;

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        let current = order::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| order_not_found(id))?;

        if self.transition_policy == OrderTransitionPolicy::Strict
            && !current.status.can_transition_to(next)
        {
            return Err(AppError::with_message(
                ErrorCode::InvalidOrderTransition,
                format!("Cannot move order {id} from {} to {next}", current.status),
            )
            .with_detail("from", current.status.as_str())
            .with_detail("to", next.as_str()));
        }

        let updated = order::update_status(&mut *tx, id, next, self.clock.now_millis())
            .await?
            .ok_or_else(|| order_not_found(id))?;

        if next.is_terminal() && !current.status.is_terminal() {
            release_table(&mut tx, &updated).await?;
        }

        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id = id, from = %current.status, to = %next, "Order status changed");
        Ok(updated)
    }

    /// Delete the order and its items, freeing the table of an active dine-in order
    pub async fn delete_order(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        let existing = order::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| order_not_found(id))?;

        order::delete_items(&mut *tx, id).await?;
        order::delete(&mut *tx, id).await?;
        if !existing.status.is_terminal() {
            release_table(&mut tx, &existing).await?;
        }

        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id = id, "Order deleted");
        Ok(())
    }
}
