use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{StrategyAssignment, TpAlert};

// ---------------------------------------------------------------------------
// Holding records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<Decimal>,
}

/// Holding as exported by the portfolio store. The token symbol arrives
/// either flat (`symbol`) or nested (`token.symbol`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRecord {
    pub id: Uuid,
    #[serde(default)]
    pub portfolio_id: Option<Uuid>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub token: Option<TokenRecord>,
    pub quantity: Decimal,
    #[serde(alias = "avgPrice", alias = "averageCost")]
    pub average_price: Decimal,
    #[serde(default)]
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub invested_amount: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Strategy records
// ---------------------------------------------------------------------------

/// Tier as stored. Exactly one of `sell_percentage` / `sell_tokens` must be
/// set; anything else is rejected during normalization.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    pub order: u32,
    pub target_type: String,
    pub target_value: Decimal,
    #[serde(default)]
    pub sell_percentage: Option<Decimal>,
    #[serde(default)]
    pub sell_tokens: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRecord {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub token: Option<TokenRecord>,
    #[serde(default)]
    pub portfolio_id: Option<Uuid>,
    /// Absent for theoretical strategies.
    #[serde(default)]
    pub holding_id: Option<Uuid>,
    #[serde(alias = "profitTargets")]
    pub targets: Vec<TargetRecord>,
}

// ---------------------------------------------------------------------------
// Snapshot file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub portfolio_id: Uuid,
    #[serde(default)]
    pub holdings: Vec<HoldingRecord>,
    #[serde(default)]
    pub strategies: Vec<StrategyRecord>,
    /// `holdingId -> strategyId | "none"`. Absent means derive from bindings.
    #[serde(default, alias = "appliedStrategies")]
    pub assignments: Option<HashMap<Uuid, StrategyAssignment>>,
    /// Alerts already persisted, keyed by holding id.
    #[serde(default)]
    pub alerts: HashMap<Uuid, Vec<TpAlert>>,
}
