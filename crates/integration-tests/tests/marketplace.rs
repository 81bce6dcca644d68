//! End-to-end marketplace flows against a real database.
//!
//! Each test gets a fresh database with all migrations applied.
//! Run with: `DATABASE_URL=... cargo test -p corner-store-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::http::{Method, StatusCode};
use corner_store_api::db::UserRepository;
use corner_store_core::{Email, Role};
use corner_store_integration_tests::{TestResponse, app, register, request, send};
use serde_json::{Value, json};
use sqlx::PgPool;

async fn call(app: &Router, method: Method, uri: &str, token: &str, body: Option<Value>) -> TestResponse {
    send(app, request(method, uri, Some(token), body.as_ref())).await
}

/// Register a user and give them the ADMIN role directly.
async fn admin_token(app: &Router, pool: &PgPool) -> String {
    let token = register(app, "Root", "root@example.in").await;
    UserRepository::new(pool)
        .set_role_by_email(&Email::parse("root@example.in").unwrap(), Role::Admin)
        .await
        .unwrap()
        .unwrap();
    token
}

/// Register a buyer, apply for `store_name` and have `admin` approve it.
async fn approved_store(app: &Router, admin: &str, email: &str, store_name: &str) -> String {
    let token = register(app, "Owner", email).await;
    let store = call(
        app,
        Method::POST,
        "/api/stores/apply",
        &token,
        Some(json!({ "storeName": store_name })),
    )
    .await;
    assert_eq!(store.status, StatusCode::CREATED);

    let id = store.body["id"].as_i64().unwrap();
    let approved = call(
        app,
        Method::PUT,
        &format!("/api/admin/stores/approve/{id}"),
        admin,
        None,
    )
    .await;
    assert_eq!(approved.status, StatusCode::OK);
    token
}

async fn list_product(app: &Router, token: &str, name: &str, price: &str) -> TestResponse {
    call(
        app,
        Method::POST,
        "/api/products",
        token,
        Some(json!({ "name": name, "priceInr": price, "size": "M", "condition": "Like new" })),
    )
    .await
}

#[sqlx::test(migrator = "corner_store_api::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_full_marketplace_scenario(pool: PgPool) {
    let app = app(pool.clone());
    let admin = admin_token(&app, &pool).await;

    // register -> login
    let alice = register(&app, "Alice", "alice@example.in").await;
    let login = send(
        &app,
        request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(&json!({ "email": "Alice@Example.in", "password": "password123" })),
        ),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["user"]["firstName"], "Alice");
    assert_eq!(login.body["user"]["role"], "BUYER");
    assert!(login.body["token"].as_str().is_some());

    // apply -> role becomes STORE, store PENDING
    let store = call(
        &app,
        Method::POST,
        "/api/stores/apply",
        &alice,
        Some(json!({ "storeName": "AliceShop", "bio": "Vintage denim" })),
    )
    .await;
    assert_eq!(store.status, StatusCode::CREATED);
    assert_eq!(store.body["status"], "PENDING");
    assert_eq!(store.body["is_verified"], false);

    let me = call(&app, Method::GET, "/api/stores/me", &alice, None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["store_name"], "AliceShop");

    // pending store cannot list
    let refused = list_product(&app, &alice, "Denim jacket", "1499").await;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    assert_eq!(refused.msg(), "Your store is not yet approved to add products.");

    let pending = call(&app, Method::GET, "/api/admin/stores/pending", &admin, None).await;
    assert_eq!(pending.body.as_array().unwrap().len(), 1);

    // admin approves
    let id = store.body["id"].as_i64().unwrap();
    let approved = call(
        &app,
        Method::PUT,
        &format!("/api/admin/stores/approve/{id}"),
        &admin,
        None,
    )
    .await;
    assert_eq!(approved.status, StatusCode::OK);
    assert_eq!(approved.msg(), "Store approved successfully");
    assert_eq!(approved.body["store"]["status"], "APPROVED");
    assert_eq!(approved.body["store"]["is_verified"], true);

    // approval is not idempotent
    let again = call(
        &app,
        Method::PUT,
        &format!("/api/admin/stores/approve/{id}"),
        &admin,
        None,
    )
    .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    // create product -> ACTIVE, visible publicly
    let product = list_product(&app, &alice, "Denim jacket", "1499").await;
    assert_eq!(product.status, StatusCode::CREATED);
    assert_eq!(product.body["status"], "ACTIVE");
    assert_eq!(product.body["price_inr"], "1499.00");

    let catalog = send(&app, request(Method::GET, "/api/products", None, None)).await;
    let items = catalog.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Denim jacket");
    assert_eq!(items[0]["store_name"], "AliceShop");

    let product_id = product.body["id"].as_i64().unwrap();
    let detail = send(
        &app,
        request(Method::GET, &format!("/api/products/{product_id}"), None, None),
    )
    .await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["bio"], "Vintage denim");
    assert_eq!(detail.body["is_verified"], true);

    // bob cannot take the same store name
    let bob = register(&app, "Bob", "bob@example.in").await;
    let taken = call(
        &app,
        Method::POST,
        "/api/stores/apply",
        &bob,
        Some(json!({ "storeName": "AliceShop" })),
    )
    .await;
    assert_eq!(taken.status, StatusCode::BAD_REQUEST);
    assert_eq!(taken.msg(), "This store name is already taken.");
}

#[sqlx::test(migrator = "corner_store_api::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_duplicate_registration_and_bad_login(pool: PgPool) {
    let app = app(pool.clone());
    register(&app, "Alice", "alice@example.in").await;

    let duplicate = send(
        &app,
        request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(&json!({
                "firstName": "Alice", "lastName": "Again",
                "email": "ALICE@example.in", "password": "password456"
            })),
        ),
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.msg(), "User with this email already exists");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    for (email, password) in [
        ("alice@example.in", "wrong-password"),
        ("nobody@example.in", "password123"),
    ] {
        let response = send(
            &app,
            request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(&json!({ "email": email, "password": password })),
            ),
        )
        .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.msg(), "Invalid credentials");
    }
}

#[sqlx::test(migrator = "corner_store_api::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_roles_are_enforced(pool: PgPool) {
    let app = app(pool.clone());
    let buyer = register(&app, "Bea", "bea@example.in").await;

    let me = call(&app, Method::GET, "/api/stores/me", &buyer, None).await;
    assert_eq!(me.status, StatusCode::FORBIDDEN);
    assert_eq!(me.msg(), "Forbidden: You do not have the required role");

    let users = call(&app, Method::GET, "/api/admin/users", &buyer, None).await;
    assert_eq!(users.status, StatusCode::FORBIDDEN);

    // applying twice: the first call made the user STORE, so the guard refuses
    let first = call(
        &app,
        Method::POST,
        "/api/stores/apply",
        &buyer,
        Some(json!({ "storeName": "BeaBoutique" })),
    )
    .await;
    assert_eq!(first.status, StatusCode::CREATED);
    let second = call(
        &app,
        Method::POST,
        "/api/stores/apply",
        &buyer,
        Some(json!({ "storeName": "BeaBoutique2" })),
    )
    .await;
    assert_eq!(second.status, StatusCode::FORBIDDEN);

    // the same token now passes the STORE guard, since roles are reloaded
    let me = call(&app, Method::GET, "/api/stores/me", &buyer, None).await;
    assert_eq!(me.status, StatusCode::OK);

    let admin = admin_token(&app, &pool).await;
    let users = call(&app, Method::GET, "/api/admin/users", &admin, None).await;
    assert_eq!(users.status, StatusCode::OK);
    let users = users.body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[sqlx::test(migrator = "corner_store_api::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_product_ownership_and_partial_update(pool: PgPool) {
    let app = app(pool.clone());
    let admin = admin_token(&app, &pool).await;
    let alice = approved_store(&app, &admin, "alice@example.in", "AliceShop").await;
    let carol = approved_store(&app, &admin, "carol@example.in", "CarolCloset").await;

    let product = list_product(&app, &alice, "Silk saree", "2500.50").await;
    let id = product.body["id"].as_i64().unwrap();
    let uri = format!("/api/products/{id}");

    // partial update leaves other fields alone
    let updated = call(&app, Method::PUT, &uri, &alice, Some(json!({ "priceInr": 1999 }))).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["price_inr"], "1999.00");
    assert_eq!(updated.body["name"], "Silk saree");
    assert_eq!(updated.body["size"], "M");
    assert_eq!(updated.body["condition"], "Like new");
    assert_eq!(updated.body["created_at"], product.body["created_at"]);

    // another store gets 403, not 404
    let stolen = call(&app, Method::PUT, &uri, &carol, Some(json!({ "name": "Mine" }))).await;
    assert_eq!(stolen.status, StatusCode::FORBIDDEN);
    assert_eq!(stolen.msg(), "Not authorized to update this product");

    let deleted = call(&app, Method::DELETE, &uri, &carol, None).await;
    assert_eq!(deleted.status, StatusCode::FORBIDDEN);
    assert_eq!(deleted.msg(), "Not authorized to delete this product");

    // missing product is 404
    let missing = call(&app, Method::PUT, "/api/products/999999", &alice, Some(json!({}))).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.msg(), "Product not found");

    // existence and ownership are checked before the input
    let blank = json!({ "name": "  " });
    let missing = call(&app, Method::PUT, "/api/products/999999", &alice, Some(blank.clone())).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    let stolen = call(&app, Method::PUT, &uri, &carol, Some(blank.clone())).await;
    assert_eq!(stolen.status, StatusCode::FORBIDDEN);
    let invalid = call(&app, Method::PUT, &uri, &alice, Some(blank)).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.msg(), "Product name is required");

    // marking it sold hides it from the public catalog
    let sold = call(&app, Method::PUT, &uri, &alice, Some(json!({ "status": "SOLD" }))).await;
    assert_eq!(sold.body["status"], "SOLD");
    let hidden = send(&app, request(Method::GET, &uri, None, None)).await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
    let catalog = send(&app, request(Method::GET, "/api/products", None, None)).await;
    assert!(catalog.body.as_array().unwrap().is_empty());

    // owner deletes
    let deleted = call(&app, Method::DELETE, &uri, &alice, None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.msg(), "Product removed");
    let gone = call(&app, Method::DELETE, &uri, &alice, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrator = "corner_store_api::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_public_catalog_hides_unapproved_stores(pool: PgPool) {
    let app = app(pool.clone());
    let admin = admin_token(&app, &pool).await;
    let alice = approved_store(&app, &admin, "alice@example.in", "AliceShop").await;

    let older = list_product(&app, &alice, "Older", "100").await;
    list_product(&app, &alice, "Newer", "200").await;
    let detail_uri = format!("/api/products/{}", older.body["id"].as_i64().unwrap());

    let detail = send(&app, request(Method::GET, &detail_uri, None, None)).await;
    assert_eq!(detail.status, StatusCode::OK);

    let catalog = send(&app, request(Method::GET, "/api/products", None, None)).await;
    let names: Vec<&str> = catalog
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Newer", "Older"]);

    // Demote the store back to pending: its products disappear
    sqlx::query("UPDATE stores SET status = 'PENDING'")
        .execute(&pool)
        .await
        .unwrap();
    let catalog = send(&app, request(Method::GET, "/api/products", None, None)).await;
    assert!(catalog.body.as_array().unwrap().is_empty());

    let detail = send(&app, request(Method::GET, &detail_uri, None, None)).await;
    assert_eq!(detail.status, StatusCode::NOT_FOUND);
    assert_eq!(detail.msg(), "Product not found");
}
