//! Alert evaluation: derives alert state from current and target price.
//!
//! [`AlertView`] is never stored. It is recomputed from its two inputs on
//! every read, so it cannot drift from the price history or the target.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Derived alert state for a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AlertView {
    /// `true` iff both prices are known and `current <= target`.
    pub triggered: bool,
    /// `max(0, target - current)`; absent when either price is unknown.
    #[schema(value_type = Option<String>)]
    pub savings_amount: Option<Decimal>,
    /// `savings_amount / target * 100`; absent when either price is unknown
    /// or the target is zero.
    #[schema(value_type = Option<String>)]
    pub savings_percent: Option<Decimal>,
}

impl AlertView {
    /// Alert view for a product with missing current or target price.
    pub const INACTIVE: Self = Self {
        triggered: false,
        savings_amount: None,
        savings_percent: None,
    };
}

/// Evaluates the alert state for a `(current, target)` price pair.
///
/// Pure and deterministic. A zero target only triggers on a zero current
/// price, and leaves `savings_percent` undefined instead of dividing by zero.
#[must_use]
pub fn evaluate(current: Option<Decimal>, target: Option<Decimal>) -> AlertView {
    let (Some(current), Some(target)) = (current, target) else {
        return AlertView::INACTIVE;
    };

    let savings_amount = (target - current).max(Decimal::ZERO);
    let savings_percent = if target > Decimal::ZERO {
        savings_amount
            .checked_div(target)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    } else {
        None
    };

    AlertView {
        triggered: current <= target,
        savings_amount: Some(savings_amount),
        savings_percent,
    }
}
