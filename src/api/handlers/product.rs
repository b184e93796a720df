//! Product CRUD handlers: create, list, get, history, update, delete, plus
//! URL testing and dashboard statistics.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CreateProductRequest, HistoryQuery, HistoryResponse, PaginationParams, ProductDetailResponse,
    ProductFilter, ProductListResponse, ProductSummaryDto, TestUrlRequest, TestUrlResponse, UpdateProductRequest,
};
use crate::app_state::AppState;
use crate::domain::{ProductId, ProductUpdate, RegistryStatistics};
use crate::error::{ErrorResponse, TrackerError};

/// `POST /products`: Start tracking a product.
///
/// # Errors
///
/// Returns [`TrackerError`] on an invalid name, URL or target price.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    summary = "Track a new product",
    description = "Validates and stores a product. The URL is not probed; use `POST /products/test-url` or a refresh for that.",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductSummaryDto),
        (status = 400, description = "Invalid name, URL or target price", body = ErrorResponse),
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let summary = state.product_service.create_product(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ProductSummaryDto::from(summary))))
}

/// `GET /products`: List products with pagination.
///
/// # Errors
///
/// Returns [`TrackerError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    summary = "List products",
    description = "Returns a paginated list of products in creation order, each with price statistics and alert state computed at read time. `active` narrows the list to active or inactive products.",
    params(PaginationParams, ProductFilter),
    responses(
        (status = 200, description = "Paginated product list", body = ProductListResponse),
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse, TrackerError> {
    let summaries: Vec<_> = state
        .product_service
        .list_products()
        .await
        .into_iter()
        .filter(|summary| filter.matches(summary))
        .collect();
    let (page, pagination) = params.paginate(summaries);

    Ok(Json(ProductListResponse {
        data: page.into_iter().map(ProductSummaryDto::from).collect(),
        pagination,
    }))
}

/// `GET /products/{id}`: Get a product with its full history.
///
/// # Errors
///
/// Returns [`TrackerError::ProductNotFound`] if the product does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    summary = "Get product details",
    description = "Returns the product, its price statistics, alert state and full price history.",
    params(
        ("id" = uuid::Uuid, Path, description = "Product UUID"),
        HistoryQuery,
    ),
    responses(
        (status = 200, description = "Product details", body = ProductDetailResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, TrackerError> {
    let detail = state
        .product_service
        .get_product(ProductId::from_uuid(id), query.order)
        .await?;
    Ok(Json(ProductDetailResponse::from(detail)))
}

/// `GET /products/{id}/history`: Get a product's price history.
///
/// # Errors
///
/// Returns [`TrackerError::ProductNotFound`] if the product does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/history",
    tag = "Products",
    summary = "Get price history",
    description = "Returns the product's observations, oldest first unless `order=newest`.",
    params(
        ("id" = uuid::Uuid, Path, description = "Product UUID"),
        HistoryQuery,
    ),
    responses(
        (status = 200, description = "Price history", body = HistoryResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn product_history(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, TrackerError> {
    let product_id = ProductId::from_uuid(id);
    let view = state
        .product_service
        .history(product_id, query.order)
        .await?;
    Ok(Json(HistoryResponse::new(product_id, view)))
}

/// `PUT`/`PATCH /products/{id}`: Partially update a product.
///
/// # Errors
///
/// Returns [`TrackerError::ProductNotFound`] if the product does not exist,
/// or a validation error for invalid fields.
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}",
    tag = "Products",
    summary = "Update a product",
    description = "Updates any of name, url and target_price. Omitted fields are unchanged; `\"target_price\": null` clears the alert threshold. Also served on PUT.",
    params(
        ("id" = uuid::Uuid, Path, description = "Product UUID"),
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductSummaryDto),
        (status = 400, description = "Invalid field value", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let update = ProductUpdate::from(req);
    let summary = state
        .product_service
        .update_product(ProductId::from_uuid(id), &update)
        .await?;
    Ok(Json(ProductSummaryDto::from(summary)))
}

/// `DELETE /products/{id}`: Stop tracking a product.
///
/// # Errors
///
/// Returns [`TrackerError::ProductNotFound`] if the product does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Products",
    summary = "Delete a product",
    description = "Removes the product together with its entire price history.",
    params(
        ("id" = uuid::Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, TrackerError> {
    state
        .product_service
        .delete_product(ProductId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /products/test-url`: Probe a URL without tracking it.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidUrl`] for a malformed URL. Unreachable
/// pages are reported in the response body, not as errors.
#[utoipa::path(
    post,
    path = "/api/v1/products/test-url",
    tag = "Products",
    summary = "Test a product URL",
    description = "Fetches the page once and reports whether a price could be extracted. Nothing is stored.",
    request_body = TestUrlRequest,
    responses(
        (status = 200, description = "Probe result", body = TestUrlResponse),
        (status = 400, description = "Malformed URL", body = ErrorResponse),
    )
)]
pub async fn test_url(
    State(state): State<AppState>,
    Json(req): Json<TestUrlRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let report = state.product_service.test_url(&req.url).await?;
    Ok(Json(TestUrlResponse::from(report)))
}

/// `GET /products/statistics`: Dashboard statistics.
#[utoipa::path(
    get,
    path = "/api/v1/products/statistics",
    tag = "Products",
    summary = "Dashboard statistics",
    description = "Counts products, triggered alerts and observations, and sums potential savings.",
    responses(
        (status = 200, description = "Statistics", body = RegistryStatistics),
    )
)]
pub async fn statistics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.product_service.statistics().await)
}

/// Product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route("/products/statistics", get(statistics))
        .route("/products/test-url", post(test_url))
        .route(
            "/products/{id}",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .route("/products/{id}/history", get(product_history))
}
