use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// StrategyAssignment
// ---------------------------------------------------------------------------

/// Strategy applied to a holding in a forecast. Serialized as the strategy
/// id, or the literal `"none"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StrategyAssignment {
    #[default]
    None,
    Strategy(Uuid),
}

impl StrategyAssignment {
    pub fn strategy_id(&self) -> Option<Uuid> {
        match self {
            StrategyAssignment::None => None,
            StrategyAssignment::Strategy(id) => Some(*id),
        }
    }
}

impl From<Option<Uuid>> for StrategyAssignment {
    fn from(id: Option<Uuid>) -> Self {
        id.map_or(StrategyAssignment::None, StrategyAssignment::Strategy)
    }
}

impl TryFrom<String> for StrategyAssignment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(StrategyAssignment::None);
        }
        Uuid::parse_str(trimmed)
            .map(StrategyAssignment::Strategy)
            .map_err(|e| format!("invalid strategy assignment {trimmed:?}: {e}"))
    }
}

impl From<StrategyAssignment> for String {
    fn from(a: StrategyAssignment) -> Self {
        a.to_string()
    }
}

impl fmt::Display for StrategyAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyAssignment::None => f.write_str("none"),
            StrategyAssignment::Strategy(id) => write!(f, "{id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Forecast results
// ---------------------------------------------------------------------------

/// Portfolio-wide totals of a forecast.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub total_invested: Decimal,
    pub total_collected: Decimal,
    pub total_remaining_value: Decimal,
    pub total_profit: Decimal,
    pub return_percentage: Decimal,
}

/// One holding's contribution to a forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingForecast {
    pub holding_id: Uuid,
    pub token_symbol: String,
    /// Strategy actually used; `None` when the holding passed through unpriced.
    pub strategy_id: Option<Uuid>,
    pub invested: Decimal,
    pub collected: Decimal,
    pub remaining_value: Decimal,
    pub profit: Decimal,
    pub return_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioForecast {
    pub lines: Vec<HoldingForecast>,
    pub summary: GlobalSummary,
}

/// A named forecast snapshot, handed to the external store for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub name: String,
    pub applied_strategies: BTreeMap<Uuid, StrategyAssignment>,
    pub summary: GlobalSummary,
    pub created_at: DateTime<Utc>,
}
