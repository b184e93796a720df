//! # pricewatch
//!
//! REST service that tracks product prices over time and flags products
//! whose price has dropped to or below a target.
//!
//! Prices are extracted from product pages on demand, either one product
//! at a time or as a batch over the whole catalog where one failing page
//! never aborts the others. Alert state and price statistics are derived
//! from the stored history on every read and are never cached.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ProductService / RefreshService (service/)
//!     ├── PriceProbe → PriceExtractor (probe/)
//!     │
//!     ├── ProductRegistry (domain/)
//!     │
//!     └── ProductRepository: Ephemeral | PostgreSQL (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod probe;
pub mod service;
