//! OpenAPI document for the REST API.

use utoipa::OpenApi;

use super::dto::{
    AlertListResponse, CreateProductRequest, HistoryResponse, PaginationMeta,
    ProductDetailResponse, ProductDto, ProductListResponse, ProductSummaryDto, RefreshOneResponse,
    TestUrlRequest, TestUrlResponse, UpdateProductRequest,
};
use super::handlers::{alert, product, refresh, system};
use crate::domain::{
    AlertEntry, AlertView, HistoryOrder, PriceAggregate, PriceObservation, ProductId, RefreshEntry,
    RefreshOutcome, RefreshReport, RefreshSummary, RegistryStatistics,
};
use crate::error::{ErrorBody, ErrorResponse};
use crate::probe::ProbeResult;

/// Aggregated OpenAPI specification for every documented endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "pricewatch",
        description = "Product price tracking with target-price alerts."
    ),
    paths(
        product::create_product,
        product::list_products,
        product::get_product,
        product::product_history,
        product::update_product,
        product::delete_product,
        product::test_url,
        product::statistics,
        refresh::refresh_product,
        refresh::refresh_all,
        alert::list_alerts,
        system::health_handler,
    ),
    components(schemas(
        AlertEntry,
        AlertListResponse,
        AlertView,
        CreateProductRequest,
        ErrorBody,
        ErrorResponse,
        HistoryOrder,
        HistoryResponse,
        PaginationMeta,
        PriceAggregate,
        PriceObservation,
        ProbeResult,
        ProductDetailResponse,
        ProductDto,
        ProductId,
        ProductListResponse,
        ProductSummaryDto,
        RefreshEntry,
        RefreshOneResponse,
        RefreshOutcome,
        RefreshReport,
        RefreshSummary,
        RegistryStatistics,
        TestUrlRequest,
        TestUrlResponse,
        UpdateProductRequest,
        system::HealthResponse,
    )),
    tags(
        (name = "Products", description = "Tracked products and their price history"),
        (name = "Refresh", description = "On-demand price probing"),
        (name = "Alerts", description = "Products at or below their target price"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/products",
            "/api/v1/products/{id}",
            "/api/v1/products/{id}/history",
            "/api/v1/products/{id}/refresh",
            "/api/v1/products/refresh",
            "/api/v1/products/test-url",
            "/api/v1/products/statistics",
            "/api/v1/alerts",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing from OpenAPI");
        }
    }
}
