//! Domain layer: products, price history, alerts, and the product registry.
//!
//! This module contains the server-side domain model including product
//! identity, the append-only price history with its aggregates, the pure
//! alert evaluator, refresh outcomes, and the registry providing concurrent
//! product storage.

pub mod alert;
pub mod price_history;
pub mod product;
pub mod product_id;
pub mod product_registry;
pub mod refresh;
pub mod store;

pub use alert::{AlertView, evaluate};
pub use price_history::{
    HistoryOrder, HistoryView, PriceAggregate, PriceHistory, PriceObservation,
};
pub use product::{
    NewProduct, Product, ProductDetail, ProductEntry, ProductSummary, ProductUpdate,
    parse_source_url,
};
pub use product_id::ProductId;
pub use product_registry::{AlertEntry, ProductRegistry, RegistryStatistics};
pub use refresh::{RefreshEntry, RefreshOutcome, RefreshReport, RefreshSummary};
pub use store::detect_store;
