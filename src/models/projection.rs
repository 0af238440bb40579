use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one tier of a chained take-profit simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierResult {
    pub order: u32,
    pub target_price: Decimal,
    pub tokens_sold: Decimal,
    pub amount_collected: Decimal,
    /// Running balance after this tier.
    pub remaining_tokens: Decimal,
    pub remaining_valuation_at_target: Decimal,
    pub remaining_valuation_at_cost: Decimal,
}

/// Price basis for the tokens left unsold after the last tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMode {
    /// Current market price (average cost when no price is known).
    /// Used for portfolio forecasts.
    MarketPrice,
    /// Target price of the last configured tier.
    /// Used for strategy-authoring previews.
    LastTarget,
    /// Average cost.
    CostBasis,
}

impl ValuationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationMode::MarketPrice => "market",
            ValuationMode::LastTarget => "last_target",
            ValuationMode::CostBasis => "cost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "market" | "market_price" | "current" => Some(ValuationMode::MarketPrice),
            "last_target" | "target" => Some(ValuationMode::LastTarget),
            "cost" | "cost_basis" | "average" => Some(ValuationMode::CostBasis),
            _ => None,
        }
    }
}

impl fmt::Display for ValuationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Net result of applying one strategy to one holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSummary {
    pub total_invested: Decimal,
    pub total_collected: Decimal,
    pub net_result: Decimal,
    pub return_percentage: Decimal,
    pub final_remaining_tokens: Decimal,
    pub final_remaining_value: Decimal,
    pub valuation: ValuationMode,
}
