//! Append-only price history with incrementally maintained aggregates.
//!
//! A [`PriceHistory`] belongs to exactly one product. Observations are kept
//! in insertion order; the "current" price is always the last appended
//! observation, regardless of its timestamp.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::TrackerError;

/// One timestamped price reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriceObservation {
    /// When the price was observed.
    pub timestamp: DateTime<Utc>,
    /// Observed price (non-negative).
    #[schema(value_type = String)]
    pub price: Decimal,
}

impl PriceObservation {
    /// Creates an observation stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NegativePrice`] if `price` is below zero.
    pub fn now(price: Decimal) -> Result<Self, TrackerError> {
        Self::at(Utc::now(), price)
    }

    /// Creates an observation with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NegativePrice`] if `price` is below zero.
    pub fn at(timestamp: DateTime<Utc>, price: Decimal) -> Result<Self, TrackerError> {
        if price < Decimal::ZERO {
            return Err(TrackerError::NegativePrice(price));
        }
        Ok(Self { timestamp, price })
    }
}

/// Read order for [`PriceHistory::ordered`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrder {
    /// Insertion order, oldest observation first.
    #[default]
    Oldest,
    /// Reverse insertion order, newest observation first.
    Newest,
}

/// Aggregate statistics over a product's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriceAggregate {
    /// Price of the most recently appended observation.
    #[schema(value_type = Option<String>)]
    pub current: Option<Decimal>,
    /// Lowest observed price.
    #[schema(value_type = Option<String>)]
    pub min: Option<Decimal>,
    /// Highest observed price.
    #[schema(value_type = Option<String>)]
    pub max: Option<Decimal>,
    /// Number of observations.
    pub count: usize,
    /// Timestamp of the most recently appended observation.
    pub last_observed_at: Option<DateTime<Utc>>,
}

impl PriceAggregate {
    fn record(&mut self, observation: &PriceObservation) {
        let price = observation.price;
        self.current = Some(price);
        self.min = Some(self.min.map_or(price, |min| min.min(price)));
        self.max = Some(self.max.map_or(price, |max| max.max(price)));
        self.count = self.count.saturating_add(1);
        self.last_observed_at = Some(observation.timestamp);
    }

    /// Percentage the current price sits below the historical maximum,
    /// rounded to one decimal place.
    ///
    /// `Some(0)` when the current price is the peak; `None` when the history
    /// is empty or the peak is zero.
    #[must_use]
    pub fn discount_from_peak_percent(&self) -> Option<Decimal> {
        let (current, max) = (self.current?, self.max?);
        if max <= Decimal::ZERO {
            return None;
        }
        if current >= max {
            return Some(Decimal::ZERO);
        }
        (max - current)
            .checked_div(max)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|percent| percent.round_dp(1))
    }
}

/// One product's observations and aggregate, read together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    /// Aggregate over the whole history.
    pub aggregate: PriceAggregate,
    /// Observations in the requested order.
    pub observations: Vec<PriceObservation>,
}

/// Ordered, append-only log of observations for one product.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    observations: Vec<PriceObservation>,
    aggregate: PriceAggregate,
}

impl PriceHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a history from stored observations, in the given order.
    #[must_use]
    pub fn from_observations(observations: impl IntoIterator<Item = PriceObservation>) -> Self {
        let mut history = Self::new();
        for observation in observations {
            history.append(observation);
        }
        history
    }

    /// Appends an observation and updates the aggregate in O(1).
    ///
    /// A timestamp earlier than the last stored one is clamped to it, so
    /// timestamps never decrease along the log. Returns the stored
    /// observation.
    pub fn append(&mut self, observation: PriceObservation) -> PriceObservation {
        let stored = self.stamp(observation);
        self.aggregate.record(&stored);
        self.observations.push(stored);
        stored
    }

    /// Returns the observation as it would be stored by [`Self::append`].
    #[must_use]
    pub fn stamp(&self, mut observation: PriceObservation) -> PriceObservation {
        if let Some(last) = self.observations.last()
            && observation.timestamp < last.timestamp
        {
            observation.timestamp = last.timestamp;
        }
        observation
    }

    /// Current aggregate statistics.
    #[must_use]
    pub const fn aggregate(&self) -> &PriceAggregate {
        &self.aggregate
    }

    /// Observations copied out in the requested order.
    #[must_use]
    pub fn ordered(&self, order: HistoryOrder) -> Vec<PriceObservation> {
        match order {
            HistoryOrder::Oldest => self.observations.clone(),
            HistoryOrder::Newest => self.observations.iter().rev().copied().collect(),
        }
    }

    /// Observations in the requested order with the aggregate.
    #[must_use]
    pub fn view(&self, order: HistoryOrder) -> HistoryView {
        HistoryView {
            aggregate: self.aggregate,
            observations: self.ordered(order),
        }
    }
}
