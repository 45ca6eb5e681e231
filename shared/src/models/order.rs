//! Order Model

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the order is fulfilled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderType {
    /// Served at a table; links the order to table occupancy
    #[serde(rename = "dine-in", alias = "dine_in")]
    #[cfg_attr(feature = "db", sqlx(rename = "dine-in"))]
    DineIn,
    #[serde(rename = "takeout", alias = "takeaway")]
    #[cfg_attr(feature = "db", sqlx(rename = "takeout"))]
    Takeout,
    #[serde(rename = "delivery")]
    #[cfg_attr(feature = "db", sqlx(rename = "delivery"))]
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine-in",
            OrderType::Takeout => "takeout",
            OrderType::Delivery => "delivery",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = AppError;

    /// Accepts the serde names and their aliases (`dine_in`, `takeaway`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dine-in" | "dine_in" => Ok(OrderType::DineIn),
            "takeout" | "takeaway" => Ok(OrderType::Takeout),
            "delivery" => Ok(OrderType::Delivery),
            _ => Err(AppError::with_message(
                ErrorCode::InvalidOrderType,
                format!("Invalid order type '{s}'"),
            )
            .with_detail("field", "order_type")
            .with_detail("allowed", "dine-in, takeout, delivery")),
        }
    }
}

/// Order lifecycle status
///
/// Intended flow: received → preparing → ready → delivered, with cancelled
/// reachable from received or preparing. See [`OrderStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Received,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Received,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Statuses the kitchen still has to act on
    pub const ACTIVE: [OrderStatus; 3] = [
        OrderStatus::Received,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Delivered and cancelled orders release their table
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Transition table of the strict order state machine
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Received, Preparing)
                | (Preparing, Ready)
                | (Ready, Delivered)
                | (Received, Cancelled)
                | (Preparing, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidOrderStatus,
                    format!("Invalid order status '{s}'"),
                )
                .with_detail("field", "status")
                .with_detail("allowed", "received, preparing, ready, delivered, cancelled")
            })
    }
}

/// Payment state of an order
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub order_type: OrderType,
    pub location_id: String,
    /// Set only for dine-in orders
    pub table_id: Option<i64>,
    pub status: OrderStatus,
    /// Total in minor currency units
    pub total_amount: i64,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Table occupied by this order, if it is a dine-in order with a table
    pub fn occupied_table(&self) -> Option<i64> {
        match self.order_type {
            OrderType::DineIn => self.table_id,
            _ => None,
        }
    }
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    /// Unit price in minor currency units
    pub unit_price: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub customizations: Vec<String>,
}

/// Order header payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    /// Parsed with [`OrderType::from_str`] so an unknown value is reported
    /// as `InvalidOrderType` rather than a body rejection
    pub order_type: String,
    pub location_id: String,
    pub table_id: Option<i64>,
    /// Defaults to the sum of `quantity * unit_price` over the items
    pub total_amount: Option<i64>,
    pub payment_method: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

/// Line item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub unit_price: i64,
    pub customizations: Option<Vec<String>>,
}

/// Body of `POST /api/orders`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub order: OrderCreate,
    pub items: Vec<OrderItemInput>,
}

/// Order with its line items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Order listing filter (`GET /api/orders?status=&location=`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_aliases() {
        let t: OrderType = serde_json::from_str("\"dine-in\"").unwrap();
        assert_eq!(t, OrderType::DineIn);
        let t: OrderType = serde_json::from_str("\"takeaway\"").unwrap();
        assert_eq!(t, OrderType::Takeout);
        assert_eq!(serde_json::to_string(&OrderType::DineIn).unwrap(), "\"dine-in\"");
        assert!(serde_json::from_str::<OrderType>("\"drive-thru\"").is_err());
    }

    #[test]
    fn test_parse_order_type() {
        assert_eq!("dine_in".parse::<OrderType>().unwrap(), OrderType::DineIn);
        assert_eq!("takeaway".parse::<OrderType>().unwrap(), OrderType::Takeout);
        let err = "drive-thru".parse::<OrderType>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrderType);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "order_type");
    }

    #[test]
    fn test_strict_transitions() {
        use OrderStatus::*;
        assert!(Received.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Delivered));
        assert!(Received.can_transition_to(Cancelled));
        assert!(Preparing.can_transition_to(Cancelled));

        assert!(!Received.can_transition_to(Delivered));
        assert!(!Ready.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Received));
        assert!(!Cancelled.can_transition_to(Preparing));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("ready".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
        let err = "served".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrderStatus);
    }

    #[test]
    fn test_occupied_table() {
        let mut order = Order {
            id: 1,
            customer_name: "Ana".into(),
            customer_phone: "600000000".into(),
            customer_email: None,
            order_type: OrderType::DineIn,
            location_id: "centro".into(),
            table_id: Some(5),
            status: OrderStatus::Received,
            total_amount: 1200,
            payment_method: "cash".into(),
            payment_status: PaymentStatus::Pending,
            delivery_address: None,
            notes: None,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(order.occupied_table(), Some(5));
        order.order_type = OrderType::Takeout;
        assert_eq!(order.occupied_table(), None);
    }
}
