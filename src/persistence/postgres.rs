//! PostgreSQL implementation of the persistence layer.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::models::{StoredObservation, StoredProduct};
use super::{ProductRecord, ProductRepository};
use crate::config::PriceWatchConfig;
use crate::domain::{PriceObservation, Product, ProductId};
use crate::error::TrackerError;

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool using the database settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError::PersistenceError`] if the database cannot
    /// be reached.
    pub async fn connect(config: &PriceWatchConfig) -> Result<Self, TrackerError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| TrackerError::PersistenceError(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), TrackerError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| TrackerError::PersistenceError(e.to_string()))
    }
}

#[async_trait]
impl ProductRepository for PostgresPersistence {
    async fn insert_product(&self, product: &Product) -> Result<(), TrackerError> {
        sqlx::query(
            "INSERT INTO products (id, name, url, target_price, active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(*product.id.as_uuid())
        .bind(&product.name)
        .bind(product.url.as_str())
        .bind(product.target_price)
        .bind(product.active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TrackerError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), TrackerError> {
        sqlx::query(
            "UPDATE products SET name = $2, url = $3, target_price = $4, active = $5, \
             updated_at = $6 WHERE id = $1",
        )
        .bind(*product.id.as_uuid())
        .bind(&product.name)
        .bind(product.url.as_str())
        .bind(product.target_price)
        .bind(product.active)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TrackerError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), TrackerError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TrackerError::PersistenceError(e.to_string()))?;

        sqlx::query("DELETE FROM price_observations WHERE product_id = $1")
            .bind(*id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| TrackerError::PersistenceError(e.to_string()))?;

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| TrackerError::PersistenceError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| TrackerError::PersistenceError(e.to_string()))
    }

    async fn append_observation(
        &self,
        id: ProductId,
        observation: &PriceObservation,
    ) -> Result<(), TrackerError> {
        sqlx::query(
            "INSERT INTO price_observations (product_id, price, observed_at) VALUES ($1, $2, $3)",
        )
        .bind(*id.as_uuid())
        .bind(observation.price)
        .bind(observation.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| TrackerError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<ProductRecord>, TrackerError> {
        let products = sqlx::query_as::<_, StoredProduct>(
            "SELECT id, name, url, target_price, active, created_at, updated_at \
             FROM products ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TrackerError::PersistenceError(e.to_string()))?;

        let observations = sqlx::query_as::<_, StoredObservation>(
            "SELECT seq, product_id, price, observed_at FROM price_observations ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TrackerError::PersistenceError(e.to_string()))?;

        let mut by_product: HashMap<Uuid, Vec<PriceObservation>> = HashMap::new();
        for row in observations {
            by_product
                .entry(row.product_id)
                .or_default()
                .push(PriceObservation::from(row));
        }

        products
            .into_iter()
            .map(|row| {
                let observations = by_product.remove(&row.id).unwrap_or_default();
                Ok(ProductRecord {
                    product: Product::try_from(row)?,
                    observations,
                })
            })
            .collect()
    }
}
