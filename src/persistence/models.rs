//! Database row models for products and price observations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{PriceObservation, Product, ProductId, detect_store, parse_source_url};
use crate::error::TrackerError;

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredProduct {
    /// Product UUID (primary key).
    pub id: Uuid,
    /// Product name.
    pub name: String,
    /// Source URL as text.
    pub url: String,
    /// Optional alert threshold.
    pub target_price: Option<Decimal>,
    /// Whether refreshes include the product.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A row from the `price_observations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredObservation {
    /// Auto-increment row ID; defines insertion order.
    pub seq: i64,
    /// Owning product.
    pub product_id: Uuid,
    /// Observed price.
    pub price: Decimal,
    /// Observation timestamp.
    pub observed_at: DateTime<Utc>,
}

/// A product together with its history, as loaded from storage.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    /// The product.
    pub product: Product,
    /// Observations in insertion order.
    pub observations: Vec<PriceObservation>,
}

impl TryFrom<StoredProduct> for Product {
    type Error = TrackerError;

    fn try_from(row: StoredProduct) -> Result<Self, Self::Error> {
        let url = parse_source_url(&row.url).map_err(|e| {
            TrackerError::PersistenceError(format!("stored product {} has bad url: {e}", row.id))
        })?;
        Ok(Self {
            id: ProductId::from_uuid(row.id),
            name: row.name,
            store: detect_store(&url),
            url,
            target_price: row.target_price,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<StoredObservation> for PriceObservation {
    fn from(row: StoredObservation) -> Self {
        Self {
            timestamp: row.observed_at,
            price: row.price,
        }
    }
}
