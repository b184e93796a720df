//! REST endpoint handlers organized by resource.

pub mod alert;
pub mod product;
pub mod refresh;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(product::routes())
        .merge(refresh::routes())
        .merge(alert::routes())
}
