//! Product aggregate: the tracked item, its price history, and read views.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use url::Url;

use super::ProductId;
use super::alert::{self, AlertView};
use super::price_history::{HistoryOrder, PriceAggregate, PriceHistory, PriceObservation};
use super::store::detect_store;
use crate::error::TrackerError;

/// Maximum accepted product name length, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// A tracked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Unique product identifier (immutable after creation).
    pub id: ProductId,
    /// Human-readable name, never empty.
    pub name: String,
    /// Page the price is extracted from.
    pub url: Url,
    /// Alert threshold; `None` disables alerting for this product.
    pub target_price: Option<Decimal>,
    /// Store name derived from the URL host.
    pub store: Option<String>,
    /// Inactive products keep their history but are not refreshed.
    pub active: bool,
    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last change to any mutable field.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Product name.
    pub name: String,
    /// Raw source URL, validated on creation.
    pub url: String,
    /// Optional alert threshold.
    pub target_price: Option<Decimal>,
}

/// Partial update of a product. `None` leaves a field untouched.
///
/// `target_price` is doubly optional: `Some(None)` clears the threshold.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    /// New name.
    pub name: Option<String>,
    /// New raw source URL.
    pub url: Option<String>,
    /// New target price, or `Some(None)` to remove it.
    pub target_price: Option<Option<Decimal>>,
    /// Activate or deactivate refreshing.
    pub active: Option<bool>,
}

impl ProductUpdate {
    /// Returns `true` if the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.url.is_none()
            && self.target_price.is_none()
            && self.active.is_none()
    }
}

impl Product {
    /// Validates the input and builds a new product with a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidInput`] for an empty or overlong name,
    /// [`TrackerError::InvalidUrl`] for a malformed URL and
    /// [`TrackerError::NegativePrice`] for a negative target.
    pub fn create(input: NewProduct) -> Result<Self, TrackerError> {
        let name = validate_name(&input.name)?;
        let url = parse_source_url(&input.url)?;
        let target_price = validate_target(input.target_price)?;
        let now = Utc::now();
        Ok(Self {
            id: ProductId::new(),
            name,
            store: detect_store(&url),
            url,
            target_price,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns a copy of this product with the update applied.
    ///
    /// All fields are validated before anything is applied, so an invalid
    /// update never produces a half-changed product.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`Product::create`].
    pub fn with_update(&self, update: &ProductUpdate) -> Result<Self, TrackerError> {
        let name = update.name.as_deref().map(validate_name).transpose()?;
        let url = update.url.as_deref().map(parse_source_url).transpose()?;
        let target_price = update.target_price.map(validate_target).transpose()?;

        let mut next = self.clone();
        if let Some(name) = name {
            next.name = name;
        }
        if let Some(url) = url {
            next.store = detect_store(&url);
            next.url = url;
        }
        if let Some(target_price) = target_price {
            next.target_price = target_price;
        }
        if let Some(active) = update.active {
            next.active = active;
        }
        next.updated_at = Utc::now();
        Ok(next)
    }
}

/// Parses and validates a product source URL.
///
/// Accepts absolute `http` or `https` URLs that carry a host.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidUrl`] for an empty string, a relative or
/// unparsable URL, a non-http(s) scheme, or a missing host.
pub fn parse_source_url(raw: &str) -> Result<Url, TrackerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::InvalidUrl("url must not be empty".to_string()));
    }
    let url = Url::parse(trimmed).map_err(|e| TrackerError::InvalidUrl(format!("{trimmed}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TrackerError::InvalidUrl(format!(
            "{trimmed}: unsupported scheme {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(TrackerError::InvalidUrl(format!("{trimmed}: missing host")));
    }
    Ok(url)
}

fn validate_name(raw: &str) -> Result<String, TrackerError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TrackerError::InvalidInput(
            "name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(TrackerError::InvalidInput(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_target(target: Option<Decimal>) -> Result<Option<Decimal>, TrackerError> {
    match target {
        Some(price) if price < Decimal::ZERO => Err(TrackerError::NegativePrice(price)),
        other => Ok(other),
    }
}

/// Registry slot: a product with its exclusively owned history.
///
/// `removed` is set under the entry's write lock when the product is
/// deleted, so that a refresh still holding this entry cannot append to a
/// product that no longer exists.
#[derive(Debug)]
pub struct ProductEntry {
    /// The product record.
    pub product: Product,
    /// The product's price history.
    pub history: PriceHistory,
    /// Set once the product has been deleted from the registry.
    pub removed: bool,
}

impl ProductEntry {
    /// Wraps a product with the given history.
    #[must_use]
    pub const fn new(product: Product, history: PriceHistory) -> Self {
        Self {
            product,
            history,
            removed: false,
        }
    }

    /// Recomputes the alert view from the current history and target.
    #[must_use]
    pub fn alert(&self) -> AlertView {
        alert::evaluate(self.history.aggregate().current, self.product.target_price)
    }

    /// Builds the list-level read view.
    #[must_use]
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            product: self.product.clone(),
            aggregate: *self.history.aggregate(),
            alert: self.alert(),
        }
    }

    /// Builds the detail read view including the full history.
    #[must_use]
    pub fn detail(&self, order: HistoryOrder) -> ProductDetail {
        ProductDetail {
            summary: self.summary(),
            history: self.history.ordered(order),
        }
    }
}

/// Product with its aggregate statistics and alert state, computed at read
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    /// The product record.
    pub product: Product,
    /// Aggregate over the product's history.
    pub aggregate: PriceAggregate,
    /// Alert state derived from current and target price.
    pub alert: AlertView,
}

/// [`ProductSummary`] plus the full price history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    /// Summary view.
    pub summary: ProductSummary,
    /// Observations in the requested order.
    pub history: Vec<PriceObservation>,
}
