//! Service layer: business logic orchestration.
//!
//! [`ProductService`] covers catalog CRUD, URL testing and dashboard reads.
//! [`RefreshService`] probes product pages and records new prices, one
//! product at a time or as an isolated batch.

pub mod product_service;
pub mod refresh_service;

pub use product_service::{ProductService, UrlTestReport};
pub use refresh_service::RefreshService;
