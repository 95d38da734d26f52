//! Public storefront handlers: the store page, the visitor cart, and
//! checkout.
//!
//! Every cart mutation is read-modify-write against the session's cart
//! document: read the current items, apply the pure mutation, persist,
//! and return the re-projected view. There is no cross-session
//! coordination; concurrent handles on one session last-write-win.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tiendita_core::{
    cart, format_money, products_by_id, project,
    whatsapp::{build_whatsapp_link, compose_order_message},
    CartItem, Product, StoreProfile,
};
use tiendita_store::{is_safe_key_segment, CartStore, CatalogStore};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Message shown when a merchant has not configured a WhatsApp number.
const MISSING_WHATSAPP_MESSAGE: &str =
    "Esta tienda aún no tiene configurado un número para recibir pedidos.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStoreProfile {
    pub slug: String,
    pub store_name: String,
    pub currency: String,
    /// Whether checkout can work at all. The number itself stays
    /// server-side; the deep link is built here, not by the client.
    pub whatsapp_configured: bool,
}

impl PublicStoreProfile {
    fn from_profile(profile: &StoreProfile) -> Self {
        Self {
            slug: profile.slug(),
            store_name: profile.store_name.clone(),
            currency: profile.currency.clone(),
            whatsapp_configured: !profile.whatsapp.is_empty(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePageData {
    pub store: PublicStoreProfile,
    pub products: Vec<Product>,
}

/// One priced cart line, ready for drawer rendering.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub unit_price_formatted: String,
    pub line_total: Decimal,
    pub line_total_formatted: String,
}

/// Snapshot plus projection of a visitor's cart.
///
/// `items` is the raw stored sequence (dangling references included);
/// `line_items`/`total` cover resolvable entries only, while `count`
/// sums every stored quantity — the badge and the priced summary are
/// intentionally different views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub line_items: Vec<LineItemView>,
    pub total: Decimal,
    pub total_formatted: String,
    pub count: u64,
    /// Distinguishes "no durable medium" from "loaded and empty".
    pub storage_available: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutData {
    /// The wa.me deep link the host UI opens in a new browsing context.
    pub url: String,
}

fn resolve_store(
    state: &AppState,
    slug: &str,
    request_id: &str,
) -> Result<StoreProfile, ApiError> {
    state.stores.find(slug).cloned().ok_or_else(|| {
        ApiError::new(request_id.to_string(), "not_found", "store not found")
    })
}

fn check_session(session: &str, request_id: &str) -> Result<(), ApiError> {
    if is_safe_key_segment(session) {
        return Ok(());
    }
    Err(ApiError::new(
        request_id.to_string(),
        "bad_request",
        "session id must be alphanumeric with dashes or underscores",
    ))
}

fn cart_view(state: &AppState, profile: &StoreProfile, slug: &str, session: &str) -> CartView {
    let cart_store = CartStore::for_session(state.storage.clone(), slug, session);
    let items = cart_store.read();
    view_of(state, profile, slug, &cart_store, items)
}

fn view_of(
    state: &AppState,
    profile: &StoreProfile,
    slug: &str,
    cart_store: &CartStore,
    items: Vec<CartItem>,
) -> CartView {
    let products = CatalogStore::for_store(state.storage.clone(), slug).read();
    let by_id = products_by_id(&products);
    let projection = project(&items, &by_id);

    let line_items = projection
        .line_items
        .into_iter()
        .map(|line| LineItemView {
            unit_price_formatted: format_money(line.unit_price, &profile.currency),
            line_total_formatted: format_money(line.line_total, &profile.currency),
            product: line.product,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
        })
        .collect();

    CartView {
        items,
        line_items,
        total: projection.total,
        total_formatted: format_money(projection.total, &profile.currency),
        count: projection.count,
        storage_available: cart_store.is_available(),
    }
}

/// `GET /api/v1/stores/{slug}` — profile plus catalog for one page load.
pub async fn get_store_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<StorePageData>>, ApiError> {
    let profile = resolve_store(&state, &slug, &req_id.0)?;
    let products = CatalogStore::for_store(state.storage.clone(), &slug).read();

    Ok(Json(ApiResponse {
        data: StorePageData {
            store: PublicStoreProfile::from_profile(&profile),
            products,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/stores/{slug}/cart/{session}`
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((slug, session)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let profile = resolve_store(&state, &slug, &req_id.0)?;
    check_session(&session, &req_id.0)?;

    Ok(Json(ApiResponse {
        data: cart_view(&state, &profile, &slug, &session),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `POST /api/v1/stores/{slug}/cart/{session}/items` — add one unit.
pub async fn add_cart_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((slug, session)): Path<(String, String)>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let profile = resolve_store(&state, &slug, &req_id.0)?;
    check_session(&session, &req_id.0)?;

    let cart_store = CartStore::for_session(state.storage.clone(), &slug, &session);
    let next = cart::add(&cart_store.read(), &body.product_id);
    cart_store.write(&next);

    Ok(Json(ApiResponse {
        data: view_of(&state, &profile, &slug, &cart_store, next),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `DELETE /api/v1/stores/{slug}/cart/{session}/items/{product_id}` —
/// remove one unit, deleting the entry at quantity 1. Unknown ids are a
/// no-op, mirroring the pure engine.
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((slug, session, product_id)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let profile = resolve_store(&state, &slug, &req_id.0)?;
    check_session(&session, &req_id.0)?;

    let cart_store = CartStore::for_session(state.storage.clone(), &slug, &session);
    let next = cart::remove(&cart_store.read(), &product_id);
    cart_store.write(&next);

    Ok(Json(ApiResponse {
        data: view_of(&state, &profile, &slug, &cart_store, next),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `DELETE /api/v1/stores/{slug}/cart/{session}`
pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((slug, session)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let profile = resolve_store(&state, &slug, &req_id.0)?;
    check_session(&session, &req_id.0)?;

    let cart_store = CartStore::for_session(state.storage.clone(), &slug, &session);
    let next = cart::clear();
    cart_store.write(&next);

    Ok(Json(ApiResponse {
        data: view_of(&state, &profile, &slug, &cart_store, next),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `POST /api/v1/stores/{slug}/cart/{session}/checkout`
///
/// Builds the pre-filled WhatsApp deep link for the current cart. A
/// store without a configured number blocks here with a user-facing
/// message; the composer and link builder are never invoked for it.
pub async fn checkout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((slug, session)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CheckoutData>>, ApiError> {
    let profile = resolve_store(&state, &slug, &req_id.0)?;
    check_session(&session, &req_id.0)?;

    if profile.whatsapp.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "missing_whatsapp",
            MISSING_WHATSAPP_MESSAGE,
        ));
    }

    let items = CartStore::for_session(state.storage.clone(), &slug, &session).read();
    let products = CatalogStore::for_store(state.storage.clone(), &slug).read();
    let by_id = products_by_id(&products);

    let encoded = compose_order_message(&profile.store_name, &profile.currency, &items, &by_id);
    let url = build_whatsapp_link(&profile.whatsapp, &encoded, &state.country_calling_code);

    tracing::info!(store = %slug, "checkout link built");

    Ok(Json(ApiResponse {
        data: CheckoutData { url },
        meta: ResponseMeta::new(req_id.0),
    }))
}
