//! Order Repository
//!
//! Orders and their line items. Multi-row reads return items grouped by
//! order so callers can assemble [`OrderDetail`]s without N+1 queries.

use super::RepoResult;
use shared::models::{
    Order, OrderDetail, OrderItem, OrderItemInput, OrderStatus, OrderType, PaymentStatus,
};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqliteExecutor};
use std::collections::HashMap;

const COLUMNS: &str = "id, customer_name, customer_phone, customer_email, order_type, location_id, \
                       table_id, status, total_amount, payment_method, payment_status, \
                       delivery_address, notes, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, menu_item_id, quantity, unit_price, customizations";

/// Fully resolved order row to insert
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub customer_name: &'a str,
    pub customer_phone: &'a str,
    pub customer_email: Option<&'a str>,
    pub order_type: OrderType,
    pub location_id: &'a str,
    pub table_id: Option<i64>,
    pub total_amount: i64,
    pub payment_method: &'a str,
    pub payment_status: PaymentStatus,
    pub delivery_address: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub now: i64,
}

pub async fn insert(exec: impl SqliteExecutor<'_>, order: &NewOrder<'_>) -> RepoResult<Order> {
    let sql = format!(
        "INSERT INTO orders (customer_name, customer_phone, customer_email, order_type, location_id, \
         table_id, status, total_amount, payment_method, payment_status, delivery_address, notes, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let created = sqlx::query_as::<_, Order>(&sql)
        .bind(order.customer_name)
        .bind(order.customer_phone)
        .bind(order.customer_email)
        .bind(order.order_type)
        .bind(order.location_id)
        .bind(order.table_id)
        .bind(OrderStatus::Received)
        .bind(order.total_amount)
        .bind(order.payment_method)
        .bind(order.payment_status)
        .bind(order.delivery_address)
        .bind(order.notes)
        .bind(order.now)
        .bind(order.now)
        .fetch_one(exec)
        .await?;
    Ok(created)
}

pub async fn insert_item(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
    item: &OrderItemInput,
) -> RepoResult<OrderItem> {
    let sql = format!(
        "INSERT INTO order_item (order_id, menu_item_id, quantity, unit_price, customizations) \
         VALUES (?, ?, ?, ?, ?) RETURNING {ITEM_COLUMNS}"
    );
    let created = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .bind(item.menu_item_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(Json(item.customizations.clone().unwrap_or_default()))
        .fetch_one(exec)
        .await?;
    Ok(created)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {COLUMNS} FROM orders WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(order)
}

pub async fn find_items(exec: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM order_item WHERE order_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(exec)
        .await?;
    Ok(items)
}

/// Order with its items
pub async fn find_detail(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = find_by_id(&mut *conn, id).await? else {
        return Ok(None);
    };
    let items = find_items(&mut *conn, id).await?;
    Ok(Some(OrderDetail { order, items }))
}

/// Orders newest first, filtered by status and/or location
pub async fn find_all(
    exec: impl SqliteExecutor<'_>,
    status: Option<OrderStatus>,
    location: Option<&str>,
) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM orders WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR location_id = ?2) \
         ORDER BY created_at DESC, id DESC"
    );
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(status)
        .bind(location)
        .fetch_all(exec)
        .await?;
    Ok(orders)
}

/// Orders the kitchen still has to act on, oldest first, with their items
pub async fn find_active_details(conn: &mut SqliteConnection) -> RepoResult<Vec<OrderDetail>> {
    const ACTIVE: &str = "status IN ('received', 'preparing', 'ready')";

    let sql = format!("SELECT {COLUMNS} FROM orders WHERE {ACTIVE} ORDER BY created_at, id");
    let orders = sqlx::query_as::<_, Order>(&sql).fetch_all(&mut *conn).await?;

    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM order_item \
         WHERE order_id IN (SELECT id FROM orders WHERE {ACTIVE}) ORDER BY order_id, id"
    );
    let items = sqlx::query_as::<_, OrderItem>(&sql).fetch_all(&mut *conn).await?;

    Ok(group_items(orders, items))
}

fn group_items(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<OrderDetail> {
    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }
    orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderDetail { order, items }
        })
        .collect()
}

/// Set the status; `None` when the order does not exist
pub async fn update_status(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    status: OrderStatus,
    now: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("UPDATE orders SET status = ?, updated_at = ? WHERE id = ? RETURNING {COLUMNS}");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(status)
        .bind(now)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(order)
}

pub async fn delete_items(exec: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<u64> {
    let result = sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(order_id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Non-terminal orders pointing at `table_id`
pub async fn count_active_for_table(exec: impl SqliteExecutor<'_>, table_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM orders WHERE table_id = ? AND status IN ('received', 'preparing', 'ready')",
    )
    .bind(table_id)
    .fetch_one(exec)
    .await?;
    Ok(count)
}

/// Clear `table_id` on non-terminal orders of a table, returning how many changed
pub async fn detach_active_from_table(
    exec: impl SqliteExecutor<'_>,
    table_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE orders SET table_id = NULL, updated_at = ? \
         WHERE table_id = ? AND status IN ('received', 'preparing', 'ready')",
    )
    .bind(now)
    .bind(table_id)
    .execute(exec)
    .await?;
    Ok(result.rows_affected())
}

/// `(status, count)` pairs for statuses that have at least one order
pub async fn count_by_status(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<(OrderStatus, i64)>> {
    let rows = sqlx::query_as::<_, (OrderStatus, i64)>(
        "SELECT status, COUNT(*) FROM orders GROUP BY status",
    )
    .fetch_all(exec)
    .await?;
    Ok(rows)
}
