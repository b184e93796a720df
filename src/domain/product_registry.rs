//! Concurrent product storage with per-product fine-grained locking.
//!
//! [`ProductRegistry`] stores all tracked products in a `HashMap` where each
//! entry is individually protected by a [`tokio::sync::RwLock`]. This
//! allows concurrent reads on the same product and concurrent writes on
//! different products, while writes to one product are serialized.
//!
//! Every mutation is written through the injected [`ProductRepository`]
//! first and only then applied in memory, so a storage failure never leaves
//! the in-memory view ahead of durable state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::RwLock;
use url::Url;
use utoipa::ToSchema;

use super::ProductId;
use super::price_history::{HistoryOrder, HistoryView, PriceHistory, PriceObservation};
use super::product::{NewProduct, Product, ProductDetail, ProductEntry, ProductSummary, ProductUpdate};
use crate::error::TrackerError;
use crate::persistence::{EphemeralRepository, ProductRecord, ProductRepository};

/// Dashboard-level statistics over all tracked products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RegistryStatistics {
    /// Number of tracked products.
    pub total_products: usize,
    /// Number of products whose alert is triggered.
    pub active_alerts: usize,
    /// Sum of savings over triggered products.
    #[schema(value_type = String)]
    pub potential_savings: Decimal,
    /// Number of observations across all histories.
    pub total_observations: usize,
    /// Most recent observation timestamp across all products.
    pub last_observed_at: Option<DateTime<Utc>>,
}

/// A product whose current price has reached its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AlertEntry {
    /// Product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Latest observed price.
    #[schema(value_type = String)]
    pub current_price: Decimal,
    /// Alert threshold.
    #[schema(value_type = String)]
    pub target_price: Decimal,
    /// `target - current`.
    #[schema(value_type = String)]
    pub savings_amount: Decimal,
    /// Savings relative to target; absent for a zero target.
    #[schema(value_type = Option<String>)]
    pub savings_percent: Option<Decimal>,
}

impl AlertEntry {
    fn from_summary(summary: &ProductSummary) -> Option<Self> {
        if !summary.alert.triggered {
            return None;
        }
        Some(Self {
            id: summary.product.id,
            name: summary.product.name.clone(),
            current_price: summary.aggregate.current?,
            target_price: summary.product.target_price?,
            savings_amount: summary.alert.savings_amount.unwrap_or(Decimal::ZERO),
            savings_percent: summary.alert.savings_percent,
        })
    }
}

#[derive(Debug, Default)]
struct Slots {
    entries: HashMap<ProductId, Arc<RwLock<ProductEntry>>>,
    /// Creation order, used for listing and batch snapshots.
    order: Vec<ProductId>,
}

impl Slots {
    fn insert(&mut self, entry: ProductEntry) -> Result<(), TrackerError> {
        let id = entry.product.id;
        if self.entries.contains_key(&id) {
            return Err(TrackerError::Internal(format!("product {id} already exists")));
        }
        self.entries.insert(id, Arc::new(RwLock::new(entry)));
        self.order.push(id);
        Ok(())
    }
}

/// Central store for all tracked products.
///
/// Uses a `RwLock` around the outer map and per-entry
/// `Arc<RwLock<ProductEntry>>` for fine-grained per-product locking.
///
/// # Concurrency
///
/// - Multiple tasks may read the same product concurrently.
/// - Writes to different products are concurrent.
/// - Writes to the same product are serialized.
/// - Locks are always taken outer map first, then entry. The outer lock is
///   never held across repository I/O or while waiting on an entry.
/// - A deleted entry is flagged `removed` before it leaves the map; every
///   read of a flagged entry reports the product as not found.
#[derive(Debug)]
pub struct ProductRegistry {
    slots: RwLock<Slots>,
    repository: Arc<dyn ProductRepository>,
}

impl ProductRegistry {
    /// Creates an empty registry backed by the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self {
            slots: RwLock::new(Slots::default()),
            repository,
        }
    }

    /// Creates an empty registry with no durable storage.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self::new(Arc::new(EphemeralRepository))
    }

    /// Replaces the in-memory state with everything stored in the
    /// repository. Returns the number of products loaded.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::PersistenceError`] if loading fails.
    pub async fn load_from_repository(&self) -> Result<usize, TrackerError> {
        let records = self.repository.load_all().await?;
        self.hydrate(records).await
    }

    /// Replaces the in-memory state with the given records.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Internal`] if two records share an ID.
    pub async fn hydrate(&self, records: Vec<ProductRecord>) -> Result<usize, TrackerError> {
        let mut fresh = Slots::default();
        for record in records {
            let history = PriceHistory::from_observations(record.observations);
            fresh.insert(ProductEntry::new(record.product, history))?;
        }
        let count = fresh.order.len();
        *self.slots.write().await = fresh;
        Ok(count)
    }

    /// Validates and stores a new product with an empty history.
    ///
    /// # Errors
    ///
    /// Returns a validation error from [`Product::create`], or
    /// [`TrackerError::PersistenceError`] if the repository write fails.
    pub async fn create(&self, input: NewProduct) -> Result<ProductSummary, TrackerError> {
        let product = Product::create(input)?;
        self.repository.insert_product(&product).await?;

        let entry = ProductEntry::new(product, PriceHistory::new());
        let summary = entry.summary();
        self.slots.write().await.insert(entry)?;
        Ok(summary)
    }

    /// Returns the lock guarding a product's entry.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] if no product with the given
    /// ID exists.
    pub async fn entry(&self, id: ProductId) -> Result<Arc<RwLock<ProductEntry>>, TrackerError> {
        let slots = self.slots.read().await;
        slots
            .entries
            .get(&id)
            .cloned()
            .ok_or(TrackerError::ProductNotFound(*id.as_uuid()))
    }

    /// Returns the product with its aggregate and alert state.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] for an unknown ID.
    pub async fn summary(&self, id: ProductId) -> Result<ProductSummary, TrackerError> {
        let entry_lock = self.entry(id).await?;
        let entry = entry_lock.read().await;
        live(&entry)?;
        Ok(entry.summary())
    }

    /// Returns the product with its full history in the requested order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] for an unknown ID.
    pub async fn detail(
        &self,
        id: ProductId,
        order: HistoryOrder,
    ) -> Result<ProductDetail, TrackerError> {
        let entry_lock = self.entry(id).await?;
        let entry = entry_lock.read().await;
        live(&entry)?;
        Ok(entry.detail(order))
    }

    /// Returns the URL to refresh, or `None` for an inactive product.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] for an unknown ID.
    pub async fn refresh_url(&self, id: ProductId) -> Result<Option<Url>, TrackerError> {
        let entry_lock = self.entry(id).await?;
        let entry = entry_lock.read().await;
        live(&entry)?;
        Ok(entry.product.active.then(|| entry.product.url.clone()))
    }

    /// Returns a product's observations in the requested order together
    /// with the aggregate, both from the same read.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] for an unknown ID.
    pub async fn history(
        &self,
        id: ProductId,
        order: HistoryOrder,
    ) -> Result<HistoryView, TrackerError> {
        let entry_lock = self.entry(id).await?;
        let entry = entry_lock.read().await;
        live(&entry)?;
        Ok(entry.history.view(order))
    }

    /// Appends an observation to a product's history.
    ///
    /// Returns the product summary after the append.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] if the product does not
    /// exist or was deleted concurrently, and
    /// [`TrackerError::PersistenceError`] if the repository write fails, in
    /// which case the history is unchanged.
    pub async fn append_observation(
        &self,
        id: ProductId,
        observation: PriceObservation,
    ) -> Result<ProductSummary, TrackerError> {
        let entry_lock = self.entry(id).await?;
        let mut entry = entry_lock.write().await;
        live(&entry)?;

        let stored = entry.history.stamp(observation);
        self.repository.append_observation(id, &stored).await?;
        entry.history.append(stored);

        tracing::debug!(product_id = %id, price = %stored.price, "observation appended");
        Ok(entry.summary())
    }

    /// Applies a partial update to a product.
    ///
    /// An empty update returns the product unchanged without touching
    /// storage.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] for an unknown ID, a
    /// validation error for invalid fields, or
    /// [`TrackerError::PersistenceError`] if the repository write fails.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<ProductSummary, TrackerError> {
        let entry_lock = self.entry(id).await?;
        let mut entry = entry_lock.write().await;
        live(&entry)?;
        if update.is_empty() {
            return Ok(entry.summary());
        }

        let next = entry.product.with_update(update)?;
        self.repository.update_product(&next).await?;
        entry.product = next;
        Ok(entry.summary())
    }

    /// Removes a product and its entire history.
    ///
    /// The removal is atomic from the caller's view: either both the product
    /// and its history are gone, or (on storage failure) neither is.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] if no product with the given
    /// ID exists (including on a repeated delete), or
    /// [`TrackerError::PersistenceError`] if the repository delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), TrackerError> {
        let entry_lock = self.entry(id).await?;
        {
            let mut entry = entry_lock.write().await;
            live(&entry)?;
            self.repository.delete_product(id).await?;
            entry.removed = true;
        }

        let mut slots = self.slots.write().await;
        slots.entries.remove(&id);
        slots.order.retain(|existing| *existing != id);
        Ok(())
    }

    /// Returns summaries of all products in creation order.
    ///
    /// Aggregates and alert views are computed at read time.
    pub async fn list(&self) -> Vec<ProductSummary> {
        let entries: Vec<Arc<RwLock<ProductEntry>>> = {
            let slots = self.slots.read().await;
            slots
                .order
                .iter()
                .filter_map(|id| slots.entries.get(id).map(Arc::clone))
                .collect()
        };

        let mut summaries = Vec::with_capacity(entries.len());
        for entry_lock in entries {
            let entry = entry_lock.read().await;
            if !entry.removed {
                summaries.push(entry.summary());
            }
        }
        summaries
    }

    /// Returns a snapshot of all product IDs in creation order.
    pub async fn ids(&self) -> Vec<ProductId> {
        self.slots.read().await.order.clone()
    }

    /// Returns products whose alert is currently triggered.
    pub async fn alerts(&self) -> Vec<AlertEntry> {
        self.list()
            .await
            .iter()
            .filter_map(AlertEntry::from_summary)
            .collect()
    }

    /// Computes dashboard statistics over all products.
    pub async fn statistics(&self) -> RegistryStatistics {
        let mut stats = RegistryStatistics::default();
        for summary in self.list().await {
            stats.total_products = stats.total_products.saturating_add(1);
            stats.total_observations = stats
                .total_observations
                .saturating_add(summary.aggregate.count);
            stats.last_observed_at = stats.last_observed_at.max(summary.aggregate.last_observed_at);
            if summary.alert.triggered {
                stats.active_alerts = stats.active_alerts.saturating_add(1);
                stats.potential_savings += summary.alert.savings_amount.unwrap_or(Decimal::ZERO);
            }
        }
        stats
    }

    /// Returns the number of products in the registry.
    pub async fn len(&self) -> usize {
        self.slots.read().await.order.len()
    }

    /// Returns `true` if the registry contains no products.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.order.is_empty()
    }
}

fn live(entry: &ProductEntry) -> Result<(), TrackerError> {
    if entry.removed {
        return Err(TrackerError::ProductNotFound(*entry.product.id.as_uuid()));
    }
    Ok(())
}

impl Default for ProductRegistry {
    fn default() -> Self {
        Self::ephemeral()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use tokio_test::{assert_err, assert_ok};

    /// Repository whose writes can be switched to fail.
    #[derive(Debug, Default)]
    struct FlakyRepository {
        failing: AtomicBool,
        stored: Vec<ProductRecord>,
    }

    impl FlakyRepository {
        fn fail(&self, on: bool) {
            self.failing.store(on, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), TrackerError> {
            if self.failing.load(Ordering::SeqCst) {
                Err(TrackerError::PersistenceError("disk full".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ProductRepository for FlakyRepository {
        async fn insert_product(&self, _product: &Product) -> Result<(), TrackerError> {
            self.check()
        }

        async fn update_product(&self, _product: &Product) -> Result<(), TrackerError> {
            self.check()
        }

        async fn delete_product(&self, _id: ProductId) -> Result<(), TrackerError> {
            self.check()
        }

        async fn append_observation(
            &self,
            _id: ProductId,
            _observation: &PriceObservation,
        ) -> Result<(), TrackerError> {
            self.check()
        }

        async fn load_all(&self) -> Result<Vec<ProductRecord>, TrackerError> {
            self.check()?;
            Ok(self.stored.clone())
        }
    }

    fn new_product(name: &str, target: Option<Decimal>) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            url: format!("https://shop.example.com/{name}"),
            target_price: target,
        }
    }

    fn obs(price: Decimal) -> PriceObservation {
        let Ok(observation) = PriceObservation::now(price) else {
            panic!("valid observation");
        };
        observation
    }

    async fn create(registry: &ProductRegistry, name: &str, target: Option<Decimal>) -> ProductId {
        let Ok(summary) = registry.create(new_product(name, target)).await else {
            panic!("product creation failed");
        };
        summary.product.id
    }

    #[tokio::test]
    async fn create_and_get() {
        let registry = ProductRegistry::ephemeral();
        let id = create(&registry, "laptop", Some(dec!(100))).await;

        let Ok(summary) = registry.summary(id).await else {
            panic!("product should exist");
        };
        assert_eq!(summary.product.name, "laptop");
        assert_eq!(summary.aggregate.count, 0);
        assert!(!summary.alert.triggered);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_everywhere() {
        let registry = ProductRegistry::ephemeral();
        let id = ProductId::new();
        assert!(matches!(registry.summary(id).await, Err(TrackerError::ProductNotFound(_))));
        assert!(matches!(
            registry.append_observation(id, obs(dec!(1))).await,
            Err(TrackerError::ProductNotFound(_))
        ));
        assert!(matches!(
            registry.update(id, &ProductUpdate::default()).await,
            Err(TrackerError::ProductNotFound(_))
        ));
        assert!(matches!(registry.delete(id).await, Err(TrackerError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn append_updates_aggregate_and_alert() {
        let registry = ProductRegistry::ephemeral();
        let id = create(&registry, "tv", Some(dec!(15))).await;

        for price in [dec!(10), dec!(5), dec!(20)] {
            let result = registry.append_observation(id, obs(price)).await;
            assert_ok!(result);
        }

        let Ok(view) = registry.history(id, HistoryOrder::Oldest).await else {
            panic!("history");
        };
        let agg = view.aggregate;
        assert_eq!(agg.min, Some(dec!(5)));
        assert_eq!(agg.max, Some(dec!(20)));
        assert_eq!(agg.current, Some(dec!(20)));
        assert_eq!(agg.count, view.observations.len());

        let Ok(newest) = registry.history(id, HistoryOrder::Newest).await else {
            panic!("history");
        };
        let prices: Vec<Decimal> = newest.observations.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![dec!(20), dec!(5), dec!(10)]);
        assert_eq!(newest.aggregate, agg);

        // Current price 20 is above the 15 target.
        let Ok(summary) = registry.summary(id).await else {
            panic!("summary");
        };
        assert!(!summary.alert.triggered);
    }

    #[tokio::test]
    async fn delete_removes_product_and_history() {
        let registry = ProductRegistry::ephemeral();
        let id = create(&registry, "phone", None).await;
        let _ = registry.append_observation(id, obs(dec!(300))).await;

        assert_ok!(registry.delete(id).await);
        assert!(matches!(registry.summary(id).await, Err(TrackerError::ProductNotFound(_))));
        assert!(matches!(
            registry.history(id, HistoryOrder::Oldest).await,
            Err(TrackerError::ProductNotFound(_))
        ));
        assert!(registry.ids().await.is_empty());

        // Deleting twice is not idempotent.
        assert!(matches!(registry.delete(id).await, Err(TrackerError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn held_entry_cannot_append_after_delete() {
        let registry = ProductRegistry::ephemeral();
        let id = create(&registry, "stale", None).await;
        let Ok(stale) = registry.entry(id).await else {
            panic!("entry");
        };

        assert_ok!(registry.delete(id).await);
        assert!(stale.read().await.removed);
        assert!(matches!(
            registry.append_observation(id, obs(dec!(1))).await,
            Err(TrackerError::ProductNotFound(_))
        ));
    }

    /// Repository whose deletes take a long time.
    #[derive(Debug)]
    struct SlowDeleteRepository(Duration);

    #[async_trait]
    impl ProductRepository for SlowDeleteRepository {
        async fn insert_product(&self, _product: &Product) -> Result<(), TrackerError> {
            Ok(())
        }

        async fn update_product(&self, _product: &Product) -> Result<(), TrackerError> {
            Ok(())
        }

        async fn delete_product(&self, _id: ProductId) -> Result<(), TrackerError> {
            tokio::time::sleep(self.0).await;
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

    #[tokio::test]
    async fn slow_delete_does_not_block_other_products() {
        let registry = Arc::new(ProductRegistry::new(Arc::new(SlowDeleteRepository(
            Duration::from_millis(800),
        ))));
        let doomed = create(&registry, "doomed", None).await;
        let other = create(&registry, "other", None).await;

        let deleting = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.delete(doomed).await })
        };
        // Let the delete reach the repository call.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let quick = Duration::from_millis(300);
        let Ok(url) = tokio::time::timeout(quick, registry.refresh_url(other)).await else {
            panic!("reading another product waited on the delete");
        };
        assert_ok!(url);
        let Ok(created) = tokio::time::timeout(quick, registry.create(new_product("late", None))).await
        else {
            panic!("creating a product waited on the delete");
        };
        assert_ok!(created);
        let Ok(ids) = tokio::time::timeout(quick, registry.ids()).await else {
            panic!("listing ids waited on the delete");
        };
        assert_eq!(ids.len(), 3);

        let Ok(deleted) = deleting.await else {
            panic!("delete task panicked");
        };
        assert_ok!(deleted);
        assert!(matches!(registry.summary(doomed).await, Err(TrackerError::ProductNotFound(_))));
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn storage_failure_leaves_state_untouched() {
        let repo = Arc::new(FlakyRepository::default());
        let registry = ProductRegistry::new(Arc::clone(&repo) as Arc<dyn ProductRepository>);
        let id = create(&registry, "kept", Some(dec!(50))).await;
        let _ = registry.append_observation(id, obs(dec!(60))).await;

        repo.fail(true);

        let append = registry.append_observation(id, obs(dec!(40))).await;
        assert!(matches!(append, Err(TrackerError::PersistenceError(_))));

        let update = ProductUpdate {
            name: Some("renamed".to_string()),
            ..ProductUpdate::default()
        };
        assert_err!(registry.update(id, &update).await);
        assert_err!(registry.delete(id).await);
        assert_err!(registry.create(new_product("new", None)).await);

        let Ok(summary) = registry.summary(id).await else {
            panic!("product must survive a failed delete");
        };
        assert_eq!(summary.product.name, "kept");
        assert_eq!(summary.aggregate.count, 1);
        assert_eq!(summary.aggregate.current, Some(dec!(60)));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn update_is_partial() {
        let registry = ProductRegistry::ephemeral();
        let id = create(&registry, "watch", Some(dec!(99))).await;

        let update = ProductUpdate {
            target_price: Some(Some(dec!(80))),
            ..ProductUpdate::default()
        };
        let Ok(summary) = registry.update(id, &update).await else {
            panic!("update");
        };
        assert_eq!(summary.product.name, "watch");
        assert_eq!(summary.product.target_price, Some(dec!(80)));

        let pause = ProductUpdate {
            active: Some(false),
            ..ProductUpdate::default()
        };
        let Ok(paused) = registry.update(id, &pause).await else {
            panic!("update");
        };
        assert!(!paused.product.active);
        assert_eq!(paused.product.target_price, Some(dec!(80)));
        assert!(matches!(registry.refresh_url(id).await, Ok(None)));

        let bad = ProductUpdate {
            url: Some("not-a-url".to_string()),
            ..ProductUpdate::default()
        };
        assert!(matches!(
            registry.update(id, &bad).await,
            Err(TrackerError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn list_preserves_creation_order_and_is_idempotent() {
        let registry = ProductRegistry::ephemeral();
        let a = create(&registry, "a", None).await;
        let b = create(&registry, "b", None).await;
        let c = create(&registry, "c", None).await;

        let first = registry.list().await;
        let ids: Vec<ProductId> = first.iter().map(|s| s.product.id).collect();
        assert_eq!(ids, vec![a, b, c]);

        let second = registry.list().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn statistics_and_alerts() {
        let registry = ProductRegistry::ephemeral();
        let cheap = create(&registry, "cheap", Some(dec!(100))).await;
        let pricey = create(&registry, "pricey", Some(dec!(100))).await;
        let untargeted = create(&registry, "untargeted", None).await;

        let _ = registry.append_observation(cheap, obs(dec!(80))).await;
        let _ = registry.append_observation(pricey, obs(dec!(120))).await;
        let _ = registry.append_observation(untargeted, obs(dec!(1))).await;
        let _ = registry.append_observation(untargeted, obs(dec!(2))).await;

        let stats = registry.statistics().await;
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.active_alerts, 1);
        assert_eq!(stats.potential_savings, dec!(20));
        assert_eq!(stats.total_observations, 4);
        assert!(stats.last_observed_at.is_some());

        let alerts = registry.alerts().await;
        assert_eq!(alerts.len(), 1);
        let Some(alert) = alerts.first() else {
            panic!("one alert expected");
        };
        assert_eq!(alert.id, cheap);
        assert_eq!(alert.savings_amount, dec!(20));
        assert_eq!(alert.savings_percent, Some(dec!(20)));
    }

    #[tokio::test]
    async fn hydrate_from_repository() {
        let Ok(product) = Product::create(new_product("restored", Some(dec!(10)))) else {
            panic!("valid product");
        };
        let id = product.id;
        let repo = FlakyRepository {
            failing: AtomicBool::new(false),
            stored: vec![ProductRecord {
                product,
                observations: vec![obs(dec!(12)), obs(dec!(9))],
            }],
        };
        let registry = ProductRegistry::new(Arc::new(repo));

        let Ok(count) = registry.load_from_repository().await else {
            panic!("load failed");
        };
        assert_eq!(count, 1);

        let Ok(summary) = registry.summary(id).await else {
            panic!("restored product");
        };
        assert_eq!(summary.aggregate.current, Some(dec!(9)));
        assert_eq!(summary.aggregate.count, 2);
        assert!(summary.alert.triggered);
    }

    #[tokio::test]
    async fn len_and_is_empty() {
        let registry = ProductRegistry::ephemeral();
        assert!(registry.is_empty().await);
        assert_eq!(registry.len().await, 0);

        let _ = create(&registry, "one", None).await;
        assert!(!registry.is_empty().await);
        assert_eq!(registry.len().await, 1);
    }
}
