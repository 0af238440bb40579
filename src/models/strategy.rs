use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How a tier's `target_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Percentage above the average cost.
    Percentage,
    /// Absolute price.
    Price,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Percentage => "percentage",
            TargetType::Price => "price",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "percentage" | "percent" | "pct" => Some(TargetType::Percentage),
            "price" | "absolute" => Some(TargetType::Price),
            _ => None,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exit rung of a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitTarget {
    /// 1-based execution order.
    pub order: u32,
    pub target_type: TargetType,
    pub target_value: Decimal,
    /// Share of the *original* holding quantity sold at this tier (0-100).
    pub sell_percentage: Decimal,
}

impl ProfitTarget {
    /// Price at which this tier executes for a given average cost.
    /// `None` when the price does not fit in a `Decimal`.
    pub fn target_price(&self, average_price: Decimal) -> Option<Decimal> {
        match self.target_type {
            TargetType::Percentage => (Decimal::ONE + self.target_value / Decimal::ONE_HUNDRED)
                .checked_mul(average_price),
            TargetType::Price => Some(self.target_value),
        }
    }
}

/// Whether a strategy is bound to a concrete holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StrategyKind {
    Real { portfolio_id: Uuid, holding_id: Uuid },
    /// Applies to any holding of the same token.
    Theoretical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: Uuid,
    pub name: String,
    pub token_symbol: String,
    pub kind: StrategyKind,
    pub targets: Vec<ProfitTarget>,
}

impl Strategy {
    /// Tiers in execution order. The stored list is not assumed to be sorted.
    pub fn ordered_targets(&self) -> Vec<&ProfitTarget> {
        let mut targets: Vec<&ProfitTarget> = self.targets.iter().collect();
        targets.sort_by_key(|t| t.order);
        targets
    }

    pub fn total_sell_percentage(&self) -> Decimal {
        self.targets.iter().map(|t| t.sell_percentage).sum()
    }

    pub fn is_theoretical(&self) -> bool {
        matches!(self.kind, StrategyKind::Theoretical)
    }

    pub fn holding_id(&self) -> Option<Uuid> {
        match self.kind {
            StrategyKind::Real { holding_id, .. } => Some(holding_id),
            StrategyKind::Theoretical => None,
        }
    }

    pub fn matches_token(&self, symbol: &str) -> bool {
        self.token_symbol.eq_ignore_ascii_case(symbol)
    }
}
