//! Shared harness: an in-memory server driven through `oneshot`

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use mesa_server::api::build_app;
use mesa_server::db::DbService;
use mesa_server::utils::ManualClock;
use mesa_server::{Config, ServerState};

/// 2025-06-01T12:00:00Z
pub const START_MILLIS: i64 = 1_748_779_200_000;

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    pub clock: Arc<ManualClock>,
    pub admin_token: String,
    pub kitchen_token: String,
    pub guest_token: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// Numeric `ErrorCode` of an error body
    pub fn code(&self) -> u64 {
        self.body["code"].as_u64().unwrap_or_default()
    }

    pub fn id(&self) -> i64 {
        self.body["id"].as_i64().expect("response has an id")
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::for_tests()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = DbService::in_memory().await.expect("in-memory database");
        let clock = Arc::new(ManualClock::new(START_MILLIS));
        let state = ServerState::from_parts(config, db, clock.clone());

        let jwt = &state.jwt_service;
        let admin_token = jwt.generate_token("u1", "ana", "admin").unwrap();
        let kitchen_token = jwt.generate_token("u2", "carlos", "kitchen").unwrap();
        let guest_token = jwt.generate_token("u3", "eva", "customer").unwrap();

        Self {
            app: build_app(state.clone()),
            state,
            clock,
            admin_token,
            kitchen_token,
            guest_token,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), token).await
    }

    pub async fn admin_get(&self, uri: &str) -> TestResponse {
        self.get(uri, Some(&self.admin_token)).await
    }

    pub async fn admin_post(&self, uri: &str, body: Value) -> TestResponse {
        self.post(uri, body, Some(&self.admin_token)).await
    }

    pub async fn admin_delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, Some(&self.admin_token)).await
    }

    pub async fn set_order_status(&self, id: i64, status: &str) -> TestResponse {
        self.request(
            Method::PATCH,
            &format!("/api/orders/{id}/status"),
            Some(json!({ "status": status })),
            Some(&self.kitchen_token),
        )
        .await
    }

    pub async fn create_table(&self, location: &str, number: i32, seats: i32) -> TestResponse {
        self.admin_post(
            "/api/tables",
            json!({ "location_id": location, "table_number": number, "seats": seats }),
        )
        .await
    }

    pub async fn table_status(&self, id: i64) -> String {
        let table = self.admin_get(&format!("/api/tables/{id}")).await;
        assert_eq!(table.status, StatusCode::OK, "{:?}", table.body);
        table.body["status"].as_str().unwrap().to_string()
    }

    pub async fn create_order(&self, body: Value) -> TestResponse {
        self.post("/api/orders", body, None).await
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.state.db.pool)
            .await
            .unwrap()
    }
}

pub fn dine_in_order(table_id: i64) -> Value {
    json!({
        "order": {
            "customer_name": "Ana",
            "customer_phone": "600123456",
            "order_type": "dine-in",
            "location_id": "centro",
            "table_id": table_id
        },
        "items": [
            { "menu_item_id": 1, "quantity": 2, "unit_price": 850 },
            { "menu_item_id": 2, "quantity": 1, "unit_price": 300, "customizations": ["sin hielo"] }
        ]
    })
}

pub fn takeout_order() -> Value {
    json!({
        "order": {
            "customer_name": "Luis",
            "customer_phone": "611222333",
            "order_type": "takeaway",
            "location_id": "centro"
        },
        "items": [{ "menu_item_id": 3, "quantity": 1, "unit_price": 1200 }]
    })
}

pub fn reservation(date: &str, time: &str) -> Value {
    json!({
        "name": "Marta",
        "phone": "622000111",
        "date": date,
        "time": time,
        "guests": 4
    })
}
