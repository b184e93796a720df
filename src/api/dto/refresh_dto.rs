//! Refresh DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use super::product_dto::ProductSummaryDto;
use crate::domain::RefreshOutcome;

/// Response body for `POST /products/{id}/refresh`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshOneResponse {
    /// Product state after the refresh.
    pub product: ProductSummaryDto,
    /// What the refresh did.
    pub outcome: RefreshOutcome,
}
