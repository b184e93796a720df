//! Refresh handlers: probe one product or the whole catalog.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{ProductSummaryDto, RefreshOneResponse};
use crate::app_state::AppState;
use crate::domain::{ProductId, RefreshReport};
use crate::error::{ErrorResponse, TrackerError};

/// `POST /products/{id}/refresh`: Probe one product now.
///
/// # Errors
///
/// Returns [`TrackerError::ProductNotFound`] if the product does not exist,
/// or [`TrackerError::PersistenceError`] if the new price cannot be stored.
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/refresh",
    tag = "Refresh",
    summary = "Refresh one product",
    description = "Fetches the product page and appends the price to the history when one is found. Unreachable pages are reported as an outcome, not as an error.",
    params(
        ("id" = uuid::Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Refresh outcome and product state", body = RefreshOneResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn refresh_product(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, TrackerError> {
    let product_id = ProductId::from_uuid(id);
    let outcome = state.refresh_service.refresh_one(product_id).await?;
    let summary = state
        .product_service
        .registry()
        .summary(product_id)
        .await?;
    Ok(Json(RefreshOneResponse {
        product: ProductSummaryDto::from(summary),
        outcome,
    }))
}

/// `POST /products/refresh`: Probe every product.
#[utoipa::path(
    post,
    path = "/api/v1/products/refresh",
    tag = "Refresh",
    summary = "Refresh all products",
    description = "Probes every product present when the call starts, with bounded concurrency. Always succeeds; per-product failures are reported in the entries, which follow product creation order.",
    responses(
        (status = 200, description = "Per-product outcomes and counts", body = RefreshReport),
    )
)]
pub async fn refresh_all(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.refresh_service.refresh_all().await)
}

/// Refresh routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/refresh", post(refresh_all))
        .route("/products/{id}/refresh", post(refresh_product))
}
