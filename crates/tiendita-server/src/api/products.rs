//! Merchant-facing catalog management.
//!
//! The catalog document is rewritten wholesale on every change, the same
//! write-through discipline the cart uses. Bulk import either replaces
//! the whole catalog or applies nothing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use tiendita_core::Product;
use tiendita_store::{CatalogStore, ProductsPayload};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub images: Option<Vec<String>>,
}

fn catalog_for(state: &AppState, slug: &str, request_id: &str) -> Result<CatalogStore, ApiError> {
    if state.stores.find(slug).is_none() {
        return Err(ApiError::new(
            request_id.to_string(),
            "not_found",
            "store not found",
        ));
    }
    Ok(CatalogStore::for_store(state.storage.clone(), slug))
}

fn validate_product(product: &Product, request_id: &str) -> Result<(), ApiError> {
    if product.id.trim().is_empty() {
        return Err(ApiError::new(
            request_id.to_string(),
            "validation_error",
            "product id must be non-empty",
        ));
    }
    if product.name.trim().is_empty() {
        return Err(ApiError::new(
            request_id.to_string(),
            "validation_error",
            "product name must be non-empty",
        ));
    }
    if product.price < Decimal::ZERO {
        return Err(ApiError::new(
            request_id.to_string(),
            "validation_error",
            format!("product '{}' has a negative price", product.name),
        ));
    }
    Ok(())
}

/// `GET /api/v1/stores/{slug}/products`
pub async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let catalog = catalog_for(&state, &slug, &req_id.0)?;
    Ok(Json(ApiResponse {
        data: catalog.read(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `POST /api/v1/stores/{slug}/products` — create with a fresh id,
/// newest first (the management screen lists recent products on top).
pub async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    let catalog = catalog_for(&state, &slug, &req_id.0)?;

    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: body.name,
        price: body.price,
        description: body.description,
        image_url: body.image_url,
        images: body.images,
    };
    validate_product(&product, &req_id.0)?;

    let mut products = catalog.read();
    products.insert(0, product.clone());
    catalog.write(&products);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: product,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// `PATCH /api/v1/stores/{slug}/products/{product_id}`
pub async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((slug, product_id)): Path<(String, String)>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let catalog = catalog_for(&state, &slug, &req_id.0)?;
    let mut products = catalog.read();

    let Some(product) = products.iter_mut().find(|p| p.id == product_id) else {
        return Err(ApiError::new(req_id.0, "not_found", "product not found"));
    };

    if let Some(name) = body.name {
        product.name = name;
    }
    if let Some(price) = body.price {
        product.price = price;
    }
    if let Some(description) = body.description {
        product.description = Some(description);
    }
    if let Some(image_url) = body.image_url {
        product.image_url = Some(image_url);
    }
    if let Some(images) = body.images {
        product.images = images;
    }

    let updated = product.clone();
    validate_product(&updated, &req_id.0)?;
    catalog.write(&products);

    Ok(Json(ApiResponse {
        data: updated,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `DELETE /api/v1/stores/{slug}/products/{product_id}`
///
/// Deleting an unknown id is a no-op, and carts referencing the deleted
/// product keep their entries — they just stop pricing.
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((slug, product_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let catalog = catalog_for(&state, &slug, &req_id.0)?;

    let mut products = catalog.read();
    products.retain(|p| p.id != product_id);
    catalog.write(&products);

    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/v1/stores/{slug}/products` — wholesale import.
///
/// The body must be the exported `{"products": [...]}` payload. A body
/// of any other shape, or any record failing validation, rejects the
/// whole import; nothing is partially applied.
pub async fn import_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let catalog = catalog_for(&state, &slug, &req_id.0)?;

    let Ok(payload) = serde_json::from_value::<ProductsPayload>(body) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "expected a {\"products\": [...]} payload",
        ));
    };

    for product in &payload.products {
        validate_product(product, &req_id.0)?;
    }

    catalog.write(&payload.products);

    Ok(Json(ApiResponse {
        data: payload.products,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/stores/{slug}/products/export` — the importable payload.
pub async fn export_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductsPayload>>, ApiError> {
    let catalog = catalog_for(&state, &slug, &req_id.0)?;
    Ok(Json(ApiResponse {
        data: ProductsPayload {
            products: catalog.read(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
