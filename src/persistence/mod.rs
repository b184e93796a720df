//! Persistence layer: durable storage of products and price history.
//!
//! The [`ProductRepository`] trait is injected into
//! [`crate::domain::ProductRegistry`]. The registry writes through the
//! repository before touching its in-memory state, so a storage failure
//! leaves the in-memory view unchanged.
//!
//! Two implementations are provided:
//!
//! - [`EphemeralRepository`]: no durable state, used when persistence is
//!   disabled and in tests.
//! - [`PostgresPersistence`]: `sqlx::PgPool` backed storage.

pub mod ephemeral;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{PriceObservation, Product, ProductId};
use crate::error::TrackerError;

pub use ephemeral::EphemeralRepository;
pub use models::ProductRecord;
pub use postgres::PostgresPersistence;

/// Durable storage for products and their price histories.
///
/// # Errors
///
/// Every method returns [`TrackerError::PersistenceError`] on storage
/// failure.
#[async_trait]
pub trait ProductRepository: Send + Sync + std::fmt::Debug {
    /// Stores a newly created product.
    async fn insert_product(&self, product: &Product) -> Result<(), TrackerError>;

    /// Overwrites the mutable fields of an existing product.
    async fn update_product(&self, product: &Product) -> Result<(), TrackerError>;

    /// Removes a product and its entire history in one transaction.
    async fn delete_product(&self, id: ProductId) -> Result<(), TrackerError>;

    /// Appends one observation to a product's history.
    async fn append_observation(
        &self,
        id: ProductId,
        observation: &PriceObservation,
    ) -> Result<(), TrackerError>;

    /// Loads every stored product with its history in insertion order.
    async fn load_all(&self) -> Result<Vec<ProductRecord>, TrackerError>;
}
