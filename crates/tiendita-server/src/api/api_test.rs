use axum::body::{to_bytes, Body};
use axum::http::Request;
use tower::ServiceExt;

use tiendita_core::{StoreProfile, StoresFile};

use super::*;

fn test_stores() -> StoresFile {
    StoresFile {
        stores: vec![
            StoreProfile {
                id: None,
                store_name: "Tienda Azul".to_string(),
                whatsapp: "3001234567".to_string(),
                currency: "COP".to_string(),
                slug: None,
            },
            StoreProfile {
                id: None,
                store_name: "Tienda Sin Número".to_string(),
                whatsapp: String::new(),
                currency: "COP".to_string(),
                slug: Some("sin-numero".to_string()),
            },
        ],
    }
}

fn test_app(storage: JsonStorage) -> Router {
    build_app(AppState {
        storage,
        stores: Arc::new(test_stores()),
        country_calling_code: "57".to_string(),
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json parse")
    };
    (status, json)
}

fn digits_only(formatted: &str) -> String {
    formatted.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[tokio::test]
async fn health_reports_ok_with_storage() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let (status, json) = send(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["storage"], "ok");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn health_reports_degraded_without_storage() {
    let app = test_app(JsonStorage::unavailable());

    let (status, json) = send(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["data"]["status"], "degraded");
    assert_eq!(json["data"]["storage"], "unavailable");
}

#[tokio::test]
async fn unknown_store_returns_404() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let (status, json) = send(&app, "GET", "/api/v1/stores/no-such-store", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn store_page_serves_the_demo_catalog_until_seeded() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let (status, json) = send(&app, "GET", "/api/v1/stores/tienda-azul", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["store"]["storeName"], "Tienda Azul");
    assert_eq!(json["data"]["store"]["slug"], "tienda-azul");
    assert_eq!(json["data"]["store"]["currency"], "COP");
    assert_eq!(json["data"]["store"]["whatsappConfigured"], true);
    // The phone number itself must not leak into the public payload.
    assert!(!json["data"]["store"]
        .to_string()
        .contains("3001234567"));
    assert_eq!(json["data"]["products"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn cart_starts_loaded_and_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let (status, json) = send(
        &app,
        "GET",
        "/api/v1/stores/tienda-azul/cart/visitor-1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["count"], 0);
    assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["data"]["storageAvailable"], true);
}

#[tokio::test]
async fn cart_without_storage_is_distinguishable_from_empty() {
    let app = test_app(JsonStorage::unavailable());

    let (status, json) = send(
        &app,
        "GET",
        "/api/v1/stores/tienda-azul/cart/visitor-1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["count"], 0);
    assert_eq!(json["data"]["storageAvailable"], false);
}

#[tokio::test]
async fn adding_twice_collapses_to_one_line_and_persists() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));
    let uri = "/api/v1/stores/tienda-azul/cart/visitor-1/items";
    let body = serde_json::json!({"productId": "p-001"});

    let (status, _) = send(&app, "POST", uri, Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (_, json) = send(&app, "POST", uri, Some(body)).await;

    assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["data"]["items"][0]["productId"], "p-001");
    assert_eq!(json["data"]["items"][0]["quantity"], 2);
    assert_eq!(json["data"]["count"], 2);

    // Write-through: a later request sees the same cart.
    let (_, reloaded) = send(
        &app,
        "GET",
        "/api/v1/stores/tienda-azul/cart/visitor-1",
        None,
    )
    .await;
    assert_eq!(reloaded["data"]["count"], 2);
    assert_eq!(
        digits_only(reloaded["data"]["totalFormatted"].as_str().expect("formatted")),
        "50000"
    );
}

#[tokio::test]
async fn removing_decrements_then_deletes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));
    let items_uri = "/api/v1/stores/tienda-azul/cart/visitor-1/items";
    let body = serde_json::json!({"productId": "p-002"});

    send(&app, "POST", items_uri, Some(body.clone())).await;
    send(&app, "POST", items_uri, Some(body)).await;

    let remove_uri = "/api/v1/stores/tienda-azul/cart/visitor-1/items/p-002";
    let (_, json) = send(&app, "DELETE", remove_uri, None).await;
    assert_eq!(json["data"]["items"][0]["quantity"], 1);

    let (_, json) = send(&app, "DELETE", remove_uri, None).await;
    assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(0));

    // Removing an id that is not in the cart is a quiet no-op.
    let (status, json) = send(&app, "DELETE", remove_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["count"], 0);
}

#[tokio::test]
async fn clear_discards_the_whole_cart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));
    let items_uri = "/api/v1/stores/tienda-azul/cart/visitor-1/items";

    send(&app, "POST", items_uri, Some(serde_json::json!({"productId": "p-001"}))).await;
    send(&app, "POST", items_uri, Some(serde_json::json!({"productId": "p-002"}))).await;

    let (status, json) = send(
        &app,
        "DELETE",
        "/api/v1/stores/tienda-azul/cart/visitor-1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["count"], 0);
    assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn sessions_do_not_share_carts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    send(
        &app,
        "POST",
        "/api/v1/stores/tienda-azul/cart/visitor-1/items",
        Some(serde_json::json!({"productId": "p-001"})),
    )
    .await;

    let (_, json) = send(
        &app,
        "GET",
        "/api/v1/stores/tienda-azul/cart/visitor-2",
        None,
    )
    .await;
    assert_eq!(json["data"]["count"], 0);
}

#[tokio::test]
async fn unsafe_session_ids_are_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let (status, json) = send(
        &app,
        "GET",
        "/api/v1/stores/tienda-azul/cart/bad.session",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn dangling_cart_entries_count_but_do_not_price() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));
    let items_uri = "/api/v1/stores/tienda-azul/cart/visitor-1/items";

    send(&app, "POST", items_uri, Some(serde_json::json!({"productId": "p-001"}))).await;
    send(&app, "POST", items_uri, Some(serde_json::json!({"productId": "p-001"}))).await;

    // The merchant deletes the product after it was carted.
    let (status, _) = send(
        &app,
        "DELETE",
        "/api/v1/stores/tienda-azul/products/p-001",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, json) = send(
        &app,
        "GET",
        "/api/v1/stores/tienda-azul/cart/visitor-1",
        None,
    )
    .await;
    // Badge still counts the stored entry; the priced summary drops it.
    assert_eq!(json["data"]["count"], 2);
    assert_eq!(json["data"]["lineItems"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["data"]["total"], "0");
    // The raw entry is retained in storage, not purged.
    assert_eq!(json["data"]["items"][0]["productId"], "p-001");
}

#[tokio::test]
async fn checkout_without_whatsapp_is_blocked_with_a_message() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/stores/sin-numero/cart/visitor-1/checkout",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "missing_whatsapp");
    assert!(json["error"]["message"]
        .as_str()
        .expect("message")
        .contains("número para recibir pedidos"));
}

#[tokio::test]
async fn checkout_builds_the_deep_link() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));
    let items_uri = "/api/v1/stores/tienda-azul/cart/visitor-1/items";

    send(&app, "POST", items_uri, Some(serde_json::json!({"productId": "p-001"}))).await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/stores/tienda-azul/cart/visitor-1/checkout",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let url = json["data"]["url"].as_str().expect("url");
    // The 10-digit merchant number gets the configured calling code.
    assert!(url.starts_with("https://wa.me/573001234567?text="));
    assert!(url.contains("Hola%2C%20quiero%20hacer%20un%20pedido%20en%20Tienda%20Azul."));
    assert!(url.contains("Resumen%20del%20pedido%3A"));
    assert!(url.contains("Producto%201"));
}

// ---------------------------------------------------------------------------
// Catalog management
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_product_prepends_and_returns_created() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/stores/tienda-azul/products",
        Some(serde_json::json!({"name": "Camiseta", "price": "35000"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["data"]["id"].as_str().expect("id").to_string();
    assert_eq!(json["data"]["name"], "Camiseta");

    let (_, listed) = send(&app, "GET", "/api/v1/stores/tienda-azul/products", None).await;
    let products = listed["data"].as_array().expect("products");
    assert_eq!(products.len(), 4, "demo catalog plus the new product");
    assert_eq!(products[0]["id"].as_str(), Some(id.as_str()));
}

#[tokio::test]
async fn create_product_rejects_blank_name_and_negative_price() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/stores/tienda-azul/products",
        Some(serde_json::json!({"name": "   ", "price": "1000"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "validation_error");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/stores/tienda-azul/products",
        Some(serde_json::json!({"name": "Camiseta", "price": "-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_product_patches_fields() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let (_, json) = send(
        &app,
        "PATCH",
        "/api/v1/stores/tienda-azul/products/p-001",
        Some(serde_json::json!({"price": "26000"})),
    )
    .await;
    assert_eq!(json["data"]["id"], "p-001");
    assert_eq!(json["data"]["price"], "26000");
    // Untouched fields survive the patch.
    assert_eq!(json["data"]["name"], "Producto 1");

    let (status, json) = send(
        &app,
        "PATCH",
        "/api/v1/stores/tienda-azul/products/missing-id",
        Some(serde_json::json!({"price": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn delete_product_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));
    let uri = "/api/v1/stores/tienda-azul/products/p-003";

    let (status, _) = send(&app, "DELETE", uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&app, "GET", "/api/v1/stores/tienda-azul/products", None).await;
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn import_rejects_malformed_payloads_wholesale() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let (status, json) = send(
        &app,
        "PUT",
        "/api/v1/stores/tienda-azul/products",
        Some(serde_json::json!({"nope": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/stores/tienda-azul/products",
        Some(serde_json::json!({
            "products": [
                {"id": "ok", "name": "Bueno", "price": "1000"},
                {"id": "bad", "name": "Malo", "price": "-5"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Neither attempt touched the catalog.
    let (_, listed) = send(&app, "GET", "/api/v1/stores/tienda-azul/products", None).await;
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(3));
    assert_eq!(listed["data"][0]["id"], "p-001");
}

#[tokio::test]
async fn import_replaces_and_export_roundtrips() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(JsonStorage::open(dir.path()));

    let payload = serde_json::json!({
        "products": [
            {"id": "a-1", "name": "Arepas", "price": "8000", "description": "Pack x5"}
        ]
    });
    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/stores/tienda-azul/products",
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, exported) = send(
        &app,
        "GET",
        "/api/v1/stores/tienda-azul/products/export",
        None,
    )
    .await;
    let products = exported["data"]["products"].as_array().expect("products");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], "a-1");
    assert_eq!(products[0]["name"], "Arepas");
    assert_eq!(products[0]["price"], "8000");
}
