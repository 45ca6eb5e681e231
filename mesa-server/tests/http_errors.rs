//! Error bodies, status mapping and route access control

mod common;

use common::{TestApp, dine_in_order, reservation, takeout_order};
use http::{Method, StatusCode};
use mesa_server::ErrorCode;
use serde_json::json;

fn code(c: ErrorCode) -> u64 {
    c.code() as u64
}

#[tokio::test]
async fn test_validation_errors_are_400_with_details() {
    let app = TestApp::new().await;

    let bad_table = app.create_table("centro", 0, 2).await;
    assert_eq!(bad_table.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_table.code(), code(ErrorCode::ValueOutOfRange));
    assert_eq!(bad_table.body["details"]["field"], "table_number");
    assert!(bad_table.body["message"].as_str().unwrap().contains("table_number"));

    let mut no_items = takeout_order();
    no_items["items"] = json!([]);
    let empty = app.create_order(no_items).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.code(), code(ErrorCode::OrderEmpty));

    let no_table = app.create_order(json!({
        "order": {
            "customer_name": "Ana",
            "customer_phone": "600",
            "order_type": "dine-in",
            "location_id": "centro"
        },
        "items": [{ "menu_item_id": 1, "quantity": 1, "unit_price": 100 }]
    }))
    .await;
    assert_eq!(no_table.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_table.code(), code(ErrorCode::TableRequired));

    let bad_reservation = app
        .post("/api/reservations", reservation("2025-02-30", "19:00"), None)
        .await;
    assert_eq!(bad_reservation.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_reservation.body["details"]["field"], "date");
}

#[tokio::test]
async fn test_malformed_payloads_are_400() {
    let app = TestApp::new().await;

    let mut drive_thru = takeout_order();
    drive_thru["order"]["order_type"] = json!("drive-thru");
    let unknown_type = app.create_order(drive_thru).await;
    assert_eq!(unknown_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_type.code(), code(ErrorCode::InvalidOrderType));
    assert_eq!(unknown_type.body["details"]["field"], "order_type");

    let missing_field = app.post("/api/contacts", json!({ "name": "Pilar" }), None).await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.code(), code(ErrorCode::ValidationFailed));
}

#[tokio::test]
async fn test_unknown_status_values() {
    let app = TestApp::new().await;
    let table_id = app.create_table("centro", 1, 2).await.id();
    let order_id = app.create_order(dine_in_order(table_id)).await.id();

    let order = app.set_order_status(order_id, "served").await;
    assert_eq!(order.status, StatusCode::BAD_REQUEST);
    assert_eq!(order.code(), code(ErrorCode::InvalidOrderStatus));

    let table = app
        .request(
            Method::PATCH,
            &format!("/api/tables/{table_id}/status"),
            Some(json!({ "status": "broken" })),
            Some(&app.kitchen_token),
        )
        .await;
    assert_eq!(table.status, StatusCode::BAD_REQUEST);
    assert_eq!(table.code(), code(ErrorCode::InvalidTableStatus));

    let maintenance = app
        .request(
            Method::PATCH,
            &format!("/api/tables/{table_id}/status"),
            Some(json!({ "status": "maintenance" })),
            Some(&app.kitchen_token),
        )
        .await;
    assert_eq!(maintenance.status, StatusCode::OK);
    assert_eq!(maintenance.body["status"], "maintenance");
}

#[tokio::test]
async fn test_not_found_codes() {
    let app = TestApp::new().await;

    let cases = [
        ("/api/menu/99", ErrorCode::MenuItemNotFound),
        ("/api/orders/99", ErrorCode::OrderNotFound),
        ("/api/tables/99", ErrorCode::TableNotFound),
    ];
    for (uri, expected) in cases {
        let response = app.admin_get(uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.code(), code(expected), "{uri}");
    }

    let reservation = app.admin_delete("/api/reservations/99").await;
    assert_eq!(reservation.status, StatusCode::NOT_FOUND);
    assert_eq!(reservation.code(), code(ErrorCode::ReservationNotFound));

    let unknown = app.get("/api/nothing-here", None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_staff_routes_require_token_and_role() {
    let app = TestApp::new().await;

    let anonymous = app.get("/api/orders", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.code(), code(ErrorCode::NotAuthenticated));

    let guest = app.get("/api/kitchen/orders", Some(&app.guest_token)).await;
    assert_eq!(guest.status, StatusCode::FORBIDDEN);
    assert_eq!(guest.code(), code(ErrorCode::RoleRequired));

    let kitchen = app.get("/api/orders", Some(&app.kitchen_token)).await;
    assert_eq!(kitchen.status, StatusCode::OK);
    let admin = app.get("/api/reservations", Some(&app.admin_token)).await;
    assert_eq!(admin.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_reject_kitchen_staff() {
    let app = TestApp::new().await;
    let table_id = app.create_table("centro", 1, 2).await.id();
    let kitchen = Some(app.kitchen_token.as_str());

    let create_menu = app
        .post("/api/menu", json!({ "name": "Flan", "price": 400, "category": "desserts" }), kitchen)
        .await;
    assert_eq!(create_menu.status, StatusCode::FORBIDDEN);
    assert_eq!(create_menu.code(), code(ErrorCode::AdminRequired));

    let delete_table = app
        .request(Method::DELETE, &format!("/api/tables/{table_id}"), None, kitchen)
        .await;
    assert_eq!(delete_table.status, StatusCode::FORBIDDEN);

    for uri in ["/api/contacts", "/api/dashboard/summary"] {
        let response = app.get(uri, kitchen).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{uri}");
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{uri}");
    }

    assert_eq!(app.count_rows("menu_item").await, 0);
    assert_eq!(app.count_rows("dining_table").await, 1);
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app = TestApp::new().await;

    assert_eq!(app.get("/api/menu", None).await.status, StatusCode::OK);
    assert_eq!(
        app.get("/api/availability?date=2025-06-01&time=20:00", None).await.status,
        StatusCode::OK
    );
    assert_eq!(app.create_order(takeout_order()).await.status, StatusCode::OK);
    assert_eq!(
        app.post("/api/reservations", reservation("2025-06-01", "20:00"), None)
            .await
            .status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_bad_token_is_rejected_even_on_public_routes() {
    let app = TestApp::new().await;

    let garbage = app.get("/api/menu", Some("not-a-jwt")).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.code(), code(ErrorCode::TokenInvalid));

    let missing_params = app.get("/api/availability?date=2025-06-01", None).await;
    assert_eq!(missing_params.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_params.body["details"]["field"], "time");
    assert_eq!(missing_params.code(), code(ErrorCode::RequiredField));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new().await;
    let request = http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(axum::body::Body::empty())
        .unwrap();

    use tower::ServiceExt;
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}
