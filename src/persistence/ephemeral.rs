//! Repository that keeps nothing beyond the in-memory registry.

use async_trait::async_trait;

use super::{ProductRecord, ProductRepository};
use crate::domain::{PriceObservation, Product, ProductId};
use crate::error::TrackerError;

/// No-op [`ProductRepository`]. State lives only as long as the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct EphemeralRepository;

#[async_trait]
impl ProductRepository for EphemeralRepository {
    async fn insert_product(&self, _product: &Product) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn update_product(&self, _product: &Product) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn delete_product(&self, _id: ProductId) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn append_observation(
        &self,
        _id: ProductId,
        _observation: &PriceObservation,
    ) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<ProductRecord>, TrackerError> {
        Ok(Vec::new())
    }
}
