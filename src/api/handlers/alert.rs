//! Alert handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::AlertListResponse;
use crate::app_state::AppState;

/// `GET /alerts`: Products at or below their target price.
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    tag = "Alerts",
    summary = "List triggered alerts",
    description = "Returns every product whose current price is at or below its target, with the savings against the target.",
    responses(
        (status = 200, description = "Triggered alerts", body = AlertListResponse),
    )
)]
pub async fn list_alerts(State(state): State<AppState>) -> impl IntoResponse {
    Json(AlertListResponse::from(state.product_service.alerts().await))
}

/// Alert routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/alerts", get(list_alerts))
}
