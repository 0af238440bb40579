use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How `BeforeTpTrigger::value` offsets the target price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeforeTpType {
    /// Percentage of the target price (e.g. -10 fires at 90% of target).
    Percentage,
    /// Absolute price delta (e.g. -5 fires 5 below target).
    Absolute,
}

/// Warning that fires when price approaches a tier's target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeforeTpTrigger {
    pub enabled: bool,
    pub value: Decimal,
    #[serde(rename = "type")]
    pub trigger_type: BeforeTpType,
}

impl BeforeTpTrigger {
    /// Price level at which the warning fires.
    pub fn trigger_price(&self, target_price: Decimal) -> Decimal {
        match self.trigger_type {
            BeforeTpType::Percentage => {
                target_price.saturating_mul(Decimal::ONE + self.value / Decimal::ONE_HUNDRED)
            }
            BeforeTpType::Absolute => target_price.saturating_add(self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpReachedTrigger {
    pub enabled: bool,
}

/// Alert thresholds for one tier of a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpAlert {
    pub tier_order: u32,
    pub target_price: Decimal,
    pub sell_quantity: Decimal,
    pub projected_amount: Decimal,
    /// Value of the rest of the original position at this tier's price,
    /// looking at this tier in isolation.
    pub remaining_value: Decimal,
    pub before_tp: BeforeTpTrigger,
    pub tp_reached: TpReachedTrigger,
}

/// A trigger crossed by a market price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AlertEvent {
    ApproachingTarget {
        tier_order: u32,
        trigger_price: Decimal,
        price: Decimal,
    },
    TargetReached {
        tier_order: u32,
        target_price: Decimal,
        price: Decimal,
    },
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertEvent::ApproachingTarget { tier_order, trigger_price, price } => write!(
                f,
                "TP{tier_order} approaching: price {price} >= warning level {trigger_price}"
            ),
            AlertEvent::TargetReached { tier_order, target_price, price } => write!(
                f,
                "TP{tier_order} reached: price {price} >= target {target_price}"
            ),
        }
    }
}
