//! Refresh run results: per-product outcomes and batch summaries.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::ProductId;

/// Result of refreshing one product.
///
/// Probe failures are ordinary data, not errors. Only `Updated` implies the
/// product's history grew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// A price was extracted and appended.
    Updated {
        /// The appended price.
        #[schema(value_type = String)]
        price: Decimal,
    },
    /// The page was reachable but carried no recognizable price.
    NoPriceFound,
    /// The page could not be fetched.
    Unreachable {
        /// Short human-readable reason.
        reason: String,
    },
    /// The product is inactive and was not fetched.
    Inactive,
    /// Storage or internal failure for this item within a batch.
    Failed {
        /// Short human-readable reason.
        reason: String,
    },
}

/// One line of a batch refresh report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RefreshEntry {
    /// The refreshed product.
    pub product_id: ProductId,
    /// What happened to it.
    pub outcome: RefreshOutcome,
}

/// Tally of outcomes in a batch refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RefreshSummary {
    /// Number of products attempted.
    pub total: usize,
    /// Products with a new observation.
    pub updated: usize,
    /// Products reachable without a price.
    pub no_price: usize,
    /// Products whose page could not be fetched.
    pub unreachable: usize,
    /// Inactive products left alone.
    pub inactive: usize,
    /// Products that failed for storage or internal reasons.
    pub failed: usize,
}

impl RefreshSummary {
    /// Counts the outcomes of a batch.
    #[must_use]
    pub fn tally(entries: &[RefreshEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut summary, entry| {
            summary.total += 1;
            match entry.outcome {
                RefreshOutcome::Updated { .. } => summary.updated += 1,
                RefreshOutcome::NoPriceFound => summary.no_price += 1,
                RefreshOutcome::Unreachable { .. } => summary.unreachable += 1,
                RefreshOutcome::Inactive => summary.inactive += 1,
                RefreshOutcome::Failed { .. } => summary.failed += 1,
            }
            summary
        })
    }
}

/// Full result of a batch refresh, in snapshot order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RefreshReport {
    /// One entry per product present when the run started.
    pub entries: Vec<RefreshEntry>,
    /// Outcome counts.
    pub summary: RefreshSummary,
}

impl RefreshReport {
    /// Builds a report and its summary from ordered entries.
    #[must_use]
    pub fn new(entries: Vec<RefreshEntry>) -> Self {
        let summary = RefreshSummary::tally(&entries);
        Self { entries, summary }
    }
}
