//! Alert and statistics DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::AlertEntry;

/// Response body for `GET /alerts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AlertListResponse {
    /// Triggered alerts in product creation order.
    pub data: Vec<AlertEntry>,
    /// Number of triggered alerts.
    pub total: usize,
}

impl From<Vec<AlertEntry>> for AlertListResponse {
    fn from(data: Vec<AlertEntry>) -> Self {
        Self {
            total: data.len(),
            data,
        }
    }
}
