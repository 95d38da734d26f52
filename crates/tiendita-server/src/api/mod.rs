mod products;
mod storefront;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use tiendita_core::StoresFile;
use tiendita_store::JsonStorage;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub storage: JsonStorage,
    pub stores: Arc<StoresFile>,
    pub country_calling_code: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    storage: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self { request_id }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "validation_error" | "missing_whatsapp" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/stores/{slug}", get(storefront::get_store_page))
        .route(
            "/api/v1/stores/{slug}/products",
            get(products::list_products)
                .post(products::create_product)
                .put(products::import_products),
        )
        .route(
            "/api/v1/stores/{slug}/products/export",
            get(products::export_products),
        )
        .route(
            "/api/v1/stores/{slug}/products/{product_id}",
            patch(products::update_product).delete(products::delete_product),
        )
        .route(
            "/api/v1/stores/{slug}/cart/{session}",
            get(storefront::get_cart).delete(storefront::clear_cart),
        )
        .route(
            "/api/v1/stores/{slug}/cart/{session}/items",
            post(storefront::add_cart_item),
        )
        .route(
            "/api/v1/stores/{slug}/cart/{session}/items/{product_id}",
            delete(storefront::remove_cart_item),
        )
        .route(
            "/api/v1/stores/{slug}/cart/{session}/checkout",
            post(storefront::checkout),
        )
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    if state.storage.is_available() {
        (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    storage: "ok",
                },
                meta,
            }),
        )
    } else {
        tracing::warn!("health check: storage medium unavailable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                data: HealthData {
                    status: "degraded",
                    storage: "unavailable",
                },
                meta,
            }),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
