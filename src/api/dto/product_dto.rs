//! Product DTOs for create, update, get, list and URL testing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, double_option};
use crate::domain::{
    AlertView, HistoryOrder, HistoryView, NewProduct, PriceAggregate, PriceObservation, Product,
    ProductDetail, ProductId, ProductSummary, ProductUpdate,
};
use crate::probe::ProbeResult;
use crate::service::UrlTestReport;

/// Request body for `POST /products`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    /// Product name (1–200 characters).
    pub name: String,
    /// Absolute `http`/`https` URL of the product page.
    pub url: String,
    /// Optional alert threshold, as a decimal string or number.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub target_price: Option<Decimal>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            name: req.name,
            url: req.url,
            target_price: req.target_price,
        }
    }
}

/// Request body for `PUT`/`PATCH /products/{id}`.
///
/// Omitted fields are left untouched. `"target_price": null` removes the
/// alert threshold.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New product page URL.
    #[serde(default)]
    pub url: Option<String>,
    /// New target price, or `null` to clear it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub target_price: Option<Option<Decimal>>,
    /// `false` stops refreshing the product; `true` resumes it.
    #[serde(default)]
    pub active: Option<bool>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            name: req.name,
            url: req.url,
            target_price: req.target_price,
            active: req.active,
        }
    }
}

/// Query parameters filtering the product list.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Only products in this state; omitted lists every product.
    #[serde(default)]
    pub active: Option<bool>,
}

impl ProductFilter {
    /// Returns `true` if the summary passes the filter.
    #[must_use]
    pub fn matches(&self, summary: &ProductSummary) -> bool {
        self.active.is_none_or(|active| summary.product.active == active)
    }
}

/// Query parameters selecting history order.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// `oldest` (default) or `newest`.
    #[serde(default)]
    #[param(inline)]
    pub order: HistoryOrder,
}

/// Product record as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDto {
    /// Product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Product page URL.
    pub url: String,
    /// Store detected from the URL.
    pub store: Option<String>,
    /// Alert threshold.
    #[schema(value_type = Option<String>)]
    pub target_price: Option<Decimal>,
    /// Whether refreshes include this product.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            url: product.url.into(),
            store: product.store,
            target_price: product.target_price,
            active: product.active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Product with price statistics and alert state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductSummaryDto {
    /// The product record.
    #[serde(flatten)]
    pub product: ProductDto,
    /// Latest observed price.
    #[schema(value_type = Option<String>)]
    pub current_price: Option<Decimal>,
    /// Lowest observed price.
    #[schema(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    /// Highest observed price.
    #[schema(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
    /// Number of observations.
    pub observation_count: usize,
    /// Timestamp of the latest observation.
    pub last_observed_at: Option<DateTime<Utc>>,
    /// How far the current price sits below the historical peak, in percent.
    #[schema(value_type = Option<String>)]
    pub discount_from_peak_percent: Option<Decimal>,
    /// Derived alert state.
    pub alert: AlertView,
}

impl From<ProductSummary> for ProductSummaryDto {
    fn from(summary: ProductSummary) -> Self {
        let agg = summary.aggregate;
        Self {
            product: summary.product.into(),
            current_price: agg.current,
            min_price: agg.min,
            max_price: agg.max,
            observation_count: agg.count,
            last_observed_at: agg.last_observed_at,
            discount_from_peak_percent: agg.discount_from_peak_percent(),
            alert: summary.alert,
        }
    }
}

/// Response body for `GET /products/{id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetailResponse {
    /// Product summary.
    #[serde(flatten)]
    pub summary: ProductSummaryDto,
    /// Full price history in the requested order.
    pub history: Vec<PriceObservation>,
}

impl From<ProductDetail> for ProductDetailResponse {
    fn from(detail: ProductDetail) -> Self {
        Self {
            summary: detail.summary.into(),
            history: detail.history,
        }
    }
}

/// Paginated list response for `GET /products`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    /// Products on this page.
    pub data: Vec<ProductSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `GET /products/{id}/history`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Product identifier.
    pub product_id: ProductId,
    /// Statistics over the same observations.
    pub aggregate: PriceAggregate,
    /// Observations in the requested order.
    pub observations: Vec<PriceObservation>,
}

impl HistoryResponse {
    /// Builds the response for one product's history read.
    #[must_use]
    pub fn new(product_id: ProductId, view: HistoryView) -> Self {
        Self {
            product_id,
            aggregate: view.aggregate,
            observations: view.observations,
        }
    }
}

/// Request body for `POST /products/test-url`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TestUrlRequest {
    /// URL to probe.
    pub url: String,
}

/// Response body for `POST /products/test-url`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestUrlResponse {
    /// Normalized URL.
    pub url: String,
    /// Host part of the URL.
    pub domain: String,
    /// Detected store.
    pub store: Option<String>,
    /// Probe outcome.
    pub result: ProbeResult,
}

impl From<UrlTestReport> for TestUrlResponse {
    fn from(report: UrlTestReport) -> Self {
        Self {
            url: report.url.into(),
            domain: report.domain,
            store: report.store,
            result: report.result,
        }
    }
}
