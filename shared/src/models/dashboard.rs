//! Dashboard read models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::OrderDetail;

/// Kitchen queue: orders still to be prepared or handed out, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenQueue {
    pub orders: Vec<OrderDetail>,
}

/// Admin dashboard counters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Order count per status name
    pub orders_by_status: BTreeMap<String, i64>,
    /// Table count per status name
    pub tables_by_status: BTreeMap<String, i64>,
    /// Date the reservation count refers to
    pub date: String,
    pub reservations_on_date: i64,
}

/// Summary query (`GET /api/dashboard/summary?date=`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryQuery {
    pub date: Option<String>,
}
