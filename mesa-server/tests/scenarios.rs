//! End-to-end walkthroughs of the core flows over HTTP

mod common;

use common::{TestApp, dine_in_order, reservation, takeout_order};
use http::StatusCode;
use mesa_server::core::ReservationSlotPolicy;
use mesa_server::{Config, ErrorCode};
use serde_json::json;

#[tokio::test]
async fn test_duplicate_table_number_is_rejected() {
    let app = TestApp::new().await;

    let first = app.create_table("centro", 1, 2).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["status"], "available");

    let second = app.create_table("centro", 1, 4).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.code(), ErrorCode::TableNumberExists.code() as u64);

    // Same number in another location is fine
    let other = app.create_table("playa", 1, 4).await;
    assert_eq!(other.status, StatusCode::OK);

    let list = app.get("/api/tables?location=centro", Some(&app.kitchen_token)).await;
    assert_eq!(list.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_dine_in_order_occupies_and_releases_table() {
    let app = TestApp::new().await;
    let table_id = app.create_table("centro", 5, 4).await.id();

    let created = app.create_order(dine_in_order(table_id)).await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    assert_eq!(created.body["status"], "received");
    assert_eq!(created.body["total_amount"], 2 * 850 + 300);
    assert_eq!(created.body["items"].as_array().unwrap().len(), 2);
    assert_eq!(app.table_status(table_id).await, "occupied");

    let order_id = created.id();
    let delivered = app.set_order_status(order_id, "delivered").await;
    assert_eq!(delivered.status, StatusCode::OK);
    assert_eq!(delivered.body["status"], "delivered");
    assert_eq!(app.table_status(table_id).await, "available");
}

#[tokio::test]
async fn test_reservation_makes_slot_unavailable() {
    let app = TestApp::new().await;
    let uri = "/api/availability?date=2025-06-01&time=19:00";

    let before = app.get(uri, None).await;
    assert_eq!(before.status, StatusCode::OK);
    assert_eq!(before.body["available"], true);
    assert_eq!(before.body["from_cache"], false);

    let created = app.post("/api/reservations", reservation("2025-06-01", "19:00"), None).await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);

    // Creation dropped the cached "available" answer
    let after = app.get(uri, None).await;
    assert_eq!(after.body["available"], false);
    assert_eq!(after.body["from_cache"], false);

    let again = app.get(uri, None).await;
    assert_eq!(again.body["available"], false);
    assert_eq!(again.body["from_cache"], true);
}

#[tokio::test]
async fn test_deleting_missing_order_changes_nothing() {
    let app = TestApp::new().await;
    let table_id = app.create_table("centro", 2, 2).await.id();
    let existing = app.create_order(dine_in_order(table_id)).await.id();

    let missing = app.admin_delete(&format!("/api/orders/{}", existing + 100)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.code(), ErrorCode::OrderNotFound.code() as u64);

    assert_eq!(app.count_rows("orders").await, 1);
    assert_eq!(app.count_rows("order_item").await, 2);
    assert_eq!(app.table_status(table_id).await, "occupied");
}

#[tokio::test]
async fn test_concurrent_reservations_advisory_both_succeed() {
    let app = TestApp::new().await;

    let (a, b) = tokio::join!(
        app.post("/api/reservations", reservation("2025-06-01", "20:00"), None),
        app.post("/api/reservations", reservation("2025-06-01", "20:00"), None),
    );
    assert_eq!(a.status, StatusCode::OK);
    assert_eq!(b.status, StatusCode::OK);

    let day = app
        .get("/api/reservations/date/2025-06-01", Some(&app.kitchen_token))
        .await;
    assert_eq!(day.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_concurrent_reservations_exclusive_one_conflicts() {
    let mut config = Config::for_tests();
    config.reservation_slot_policy = ReservationSlotPolicy::Exclusive;
    let app = TestApp::with_config(config).await;

    let (a, b) = tokio::join!(
        app.post("/api/reservations", reservation("2025-06-01", "20:00"), None),
        app.post("/api/reservations", reservation("2025-06-01", "20:00"), None),
    );
    let mut statuses = [a.status.as_u16(), b.status.as_u16()];
    statuses.sort();
    assert_eq!(statuses, [200, 409]);

    let conflict = if a.status == StatusCode::CONFLICT { a } else { b };
    assert_eq!(conflict.code(), ErrorCode::ReservationSlotTaken.code() as u64);
    assert_eq!(app.count_rows("reservation").await, 1);
}

#[tokio::test]
async fn test_takeout_order_lifecycle_and_kitchen_queue() {
    let app = TestApp::new().await;

    let first = app.create_order(takeout_order()).await;
    assert_eq!(first.status, StatusCode::OK, "{:?}", first.body);
    assert_eq!(first.body["order_type"], "takeout");
    assert_eq!(first.body["payment_method"], "cash");
    assert_eq!(first.body["payment_status"], "pending");
    assert!(first.body["table_id"].is_null());

    let second = app.create_order(takeout_order()).await;
    app.set_order_status(second.id(), "cancelled").await;

    let queue = app.get("/api/kitchen/orders", Some(&app.kitchen_token)).await;
    assert_eq!(queue.status, StatusCode::OK);
    let orders = queue.body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], first.id());
    assert_eq!(orders[0]["items"].as_array().unwrap().len(), 1);

    let fetched = app.get(&format!("/api/orders/{}", first.id()), Some(&app.kitchen_token)).await;
    assert_eq!(fetched.body["customer_name"], "Luis");

    let cancelled = app
        .get("/api/orders?status=cancelled", Some(&app.kitchen_token))
        .await;
    assert_eq!(cancelled.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_menu_crud_and_idempotent_reads() {
    let app = TestApp::new().await;

    let created = app
        .admin_post(
            "/api/menu",
            json!({ "name": "Gazpacho", "price": 600, "category": "starters", "customizations": ["sin ajo"] }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let id = created.id();

    let first = app.get("/api/menu", None).await;
    let second = app.get("/api/menu", None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);

    let updated = app
        .request(
            http::Method::PUT,
            &format!("/api/menu/{id}"),
            Some(json!({ "is_available": false })),
            Some(&app.admin_token),
        )
        .await;
    assert_eq!(updated.body["is_available"], false);
    assert_eq!(updated.body["name"], "Gazpacho");

    let available = app.get("/api/menu?available=true", None).await;
    assert!(available.body.as_array().unwrap().is_empty());

    let deleted = app.admin_delete(&format!("/api/menu/{id}")).await;
    assert_eq!(deleted.body, json!({ "deleted": true, "id": id }));
    let gone = app.get(&format!("/api/menu/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contacts_and_dashboard_summary() {
    let app = TestApp::new().await;

    let contact = app
        .post(
            "/api/contacts",
            json!({ "name": "Pilar", "email": "pilar@example.com", "message": "¿Tenéis terraza?" }),
            None,
        )
        .await;
    assert_eq!(contact.status, StatusCode::OK);
    let contacts = app.admin_get("/api/contacts").await;
    assert_eq!(contacts.body.as_array().unwrap().len(), 1);

    app.create_table("centro", 1, 2).await;
    app.create_order(takeout_order()).await;
    app.post("/api/reservations", reservation("2025-06-01", "21:00"), None).await;

    let summary = app.admin_get("/api/dashboard/summary").await;
    assert_eq!(summary.status, StatusCode::OK);
    assert_eq!(summary.body["date"], "2025-06-01");
    assert_eq!(summary.body["reservations_on_date"], 1);
    assert_eq!(summary.body["orders_by_status"]["received"], 1);
    assert_eq!(summary.body["tables_by_status"]["available"], 1);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");
    assert_eq!(health.body["database"], "ok");
}
