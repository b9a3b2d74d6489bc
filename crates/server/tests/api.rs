//! End-to-end tests over the router with an in-memory database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use db::DBService;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{AppState, app_router};
use services::services::config::Config;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        jwt_secret: "test-secret".to_string(),
        jwt_ttl_hours: 24,
    }
}

async fn test_app() -> (Router, DBService) {
    let db = DBService::new_in_memory().await.unwrap();
    let app = app_router(AppState::new(db.clone(), test_config()));
    (app, db)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Register a user and return their session cookie.
async fn register(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"email": email, "password": "hunter2hunter", "name": "Test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn anonymous_cart_count_degrades_to_zero() {
    let (app, _db) = test_app().await;
    let response = app
        .oneshot(get_request("/api/cart?countOnly=true", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn anonymous_wishlist_membership_is_false_not_error() {
    let (app, _db) = test_app().await;
    let response = app
        .oneshot(get_request(
            "/api/wishlist?productId=00000000-0000-0000-0000-000000000000",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["inWishlist"], false);
}

#[tokio::test]
async fn anonymous_cart_get_is_unauthorized() {
    let (app, _db) = test_app().await;
    let response = app.oneshot(get_request("/api/cart", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn add_to_cart_round_trip() {
    let (app, db) = test_app().await;
    let cookie = register(&app, "shopper@example.com").await;

    // Seed a merchant and product directly.
    let owner = db::models::user::User::create(
        &db.pool,
        &db::models::user::CreateUser {
            email: "owner@example.com".to_string(),
            password_hash: "x".to_string(),
            name: "Owner".to_string(),
        },
    )
    .await
    .unwrap();
    let merchant =
        db::models::merchant::Merchant::create(&db.pool, owner.id, "Maison", "maison", None)
            .await
            .unwrap();
    let product = db::models::product::Product::create(
        &db.pool,
        &db::models::product::CreateProduct {
            merchant_id: merchant.id,
            brand_id: None,
            name: "Silk Scarf".to_string(),
            description: String::new(),
            price_cents: 24900,
            sale_price_cents: None,
            stock_count: 5,
            category: None,
            images: vec![],
            is_new: false,
            on_sale: false,
        },
    )
    .await
    .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart",
            Some(&cookie),
            json!({"productId": product.id, "quantity": 2, "selectedColor": "Black"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalItems"], 2);
    assert_eq!(body["data"]["totalAmount"], "498.00");

    // Requesting more than stock is a 400 with the error envelope.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart",
            Some(&cookie),
            json!({"productId": product.id, "quantity": 9, "selectedColor": "Black"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn admin_routes_reject_non_admin_sessions() {
    let (app, _db) = test_app().await;
    let cookie = register(&app, "customer@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/users/status",
            Some(&cookie),
            json!({"ids": ["00000000-0000-0000-0000-000000000000"], "value": "suspended"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // And no session at all is a 401.
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/admin/users/status",
            None,
            json!({"ids": [], "value": "suspended"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn orders_are_listed_and_owner_scoped() {
    let (app, db) = test_app().await;
    let cookie = register(&app, "shopper@example.com").await;
    let other_cookie = register(&app, "other@example.com").await;

    let shopper = db::models::user::User::find_by_email(&db.pool, "shopper@example.com")
        .await
        .unwrap()
        .unwrap();
    let order = db::models::order::Order::create(
        &db.pool,
        shopper.id,
        &[db::models::order::CreateOrderItem {
            product_id: uuid::Uuid::new_v4(),
            product_name: "Silk Scarf".to_string(),
            unit_price_cents: 24900,
            quantity: 2,
            selected_color: Some("Black".to_string()),
            selected_size: None,
        }],
    )
    .await
    .unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/api/orders", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["total_cents"], 49800);
    assert_eq!(body["data"][0]["items"][0]["productName"], "Silk Scarf");

    let order_id = order.order.id;
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/orders/{order_id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Someone else's order is a 404, not a leak.
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/orders/{order_id}"),
            Some(&other_cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_bulk_order_status_update() {
    let (app, db) = test_app().await;
    let cookie = register(&app, "shopper@example.com").await;
    register(&app, "admin@example.com").await;
    sqlx::query("UPDATE users SET role = 'admin' WHERE email = 'admin@example.com'")
        .execute(&db.pool)
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "admin@example.com", "password": "hunter2hunter"}),
        ))
        .await
        .unwrap();
    let admin_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let shopper = db::models::user::User::find_by_email(&db.pool, "shopper@example.com")
        .await
        .unwrap()
        .unwrap();
    let order = db::models::order::Order::create(
        &db.pool,
        shopper.id,
        &[db::models::order::CreateOrderItem {
            product_id: uuid::Uuid::new_v4(),
            product_name: "Leather Tote".to_string(),
            unit_price_cents: 189000,
            quantity: 1,
            selected_color: None,
            selected_size: None,
        }],
    )
    .await
    .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/orders/status",
            Some(&admin_cookie),
            json!({"ids": [order.order.id], "value": "shipped"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["affected"], 1);

    let response = app
        .oneshot(get_request(
            &format!("/api/orders/{}", order.order.id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "shipped");
}

#[tokio::test]
async fn admin_can_review_applications_end_to_end() {
    let (app, db) = test_app().await;
    let applicant_cookie = register(&app, "applicant@example.com").await;
    let admin_cookie = register(&app, "admin@example.com").await;

    // Promote the second account to admin directly, then re-login so claims
    // carry the new role.
    sqlx::query("UPDATE users SET role = 'admin' WHERE email = 'admin@example.com'")
        .execute(&db.pool)
        .await
        .unwrap();
    drop(admin_cookie);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "admin@example.com", "password": "hunter2hunter"}),
        ))
        .await
        .unwrap();
    let admin_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/merchant/apply",
            Some(&applicant_cookie),
            json!({"storeName": "Chanel Atelier", "description": "Fine goods"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let application_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/admin/applications/{application_id}/approve"),
            Some(&admin_cookie),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["slug"], "chanel-atelier");

    // A second review attempt fails.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/admin/applications/{application_id}/reject"),
            Some(&admin_cookie),
            json!({"reason": "nope"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
