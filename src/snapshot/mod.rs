pub mod types;

use std::collections::HashMap;
use std::path::Path;

use uuid::Uuid;

use crate::engine::aggregator::default_assignments;
use crate::engine::projection::{resolve_tiers, SellSize, TierInput};
use crate::errors::AppError;
use crate::models::{Holding, Strategy, StrategyAssignment, StrategyKind, TargetType, TpAlert};

pub use types::{HoldingRecord, SnapshotRecord, StrategyRecord, TargetRecord, TokenRecord};

/// A portfolio normalized into engine models.
#[derive(Debug, Clone)]
pub struct PortfolioSnapshot {
    pub portfolio_id: Uuid,
    pub holdings: Vec<Holding>,
    pub strategies: Vec<Strategy>,
    pub assignments: HashMap<Uuid, StrategyAssignment>,
    pub alerts: HashMap<Uuid, Vec<TpAlert>>,
}

pub fn load_snapshot(path: &Path) -> Result<PortfolioSnapshot, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_snapshot(&raw)
}

pub fn parse_snapshot(json: &str) -> Result<PortfolioSnapshot, AppError> {
    let record: SnapshotRecord = serde_json::from_str(json)?;
    normalize_snapshot(record)
}

pub fn normalize_snapshot(record: SnapshotRecord) -> Result<PortfolioSnapshot, AppError> {
    let portfolio_id = record.portfolio_id;

    let holdings = record
        .holdings
        .into_iter()
        .map(|h| normalize_holding(h, portfolio_id))
        .collect::<Result<Vec<_>, _>>()?;

    let strategies = record
        .strategies
        .into_iter()
        .map(|s| normalize_strategy(s, portfolio_id, &holdings))
        .collect::<Result<Vec<_>, _>>()?;

    let assignments = match record.assignments {
        Some(assignments) => assignments,
        None => default_assignments(&holdings, &strategies),
    };

    tracing::debug!(
        portfolio_id = %portfolio_id,
        holdings = holdings.len(),
        strategies = strategies.len(),
        "Snapshot normalized"
    );

    Ok(PortfolioSnapshot {
        portfolio_id,
        holdings,
        strategies,
        assignments,
        alerts: record.alerts,
    })
}

fn symbol_of(symbol: Option<String>, token: Option<&TokenRecord>) -> Option<String> {
    symbol
        .or_else(|| token.map(|t| t.symbol.clone()))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
}

pub fn normalize_holding(record: HoldingRecord, portfolio_id: Uuid) -> Result<Holding, AppError> {
    let token_symbol = symbol_of(record.symbol, record.token.as_ref())
        .ok_or_else(|| AppError::InvalidRecord(format!("holding {} has no token symbol", record.id)))?;

    let current_price = record
        .current_price
        .or_else(|| record.token.as_ref().and_then(|t| t.current_price));

    Ok(Holding {
        id: record.id,
        portfolio_id: record.portfolio_id.unwrap_or(portfolio_id),
        token_symbol,
        quantity: record.quantity,
        average_price: record.average_price,
        current_price,
        invested_amount: record
            .invested_amount
            .unwrap_or(record.quantity * record.average_price),
    })
}

pub fn normalize_strategy(
    record: StrategyRecord,
    portfolio_id: Uuid,
    holdings: &[Holding],
) -> Result<Strategy, AppError> {
    let bound = match record.holding_id {
        Some(holding_id) => Some(holdings.iter().find(|h| h.id == holding_id).ok_or_else(|| {
            AppError::InvalidRecord(format!(
                "strategy {} is bound to unknown holding {holding_id}",
                record.id
            ))
        })?),
        None => None,
    };

    let token_symbol = symbol_of(record.symbol, record.token.as_ref())
        .or_else(|| bound.map(|h| h.token_symbol.clone()))
        .ok_or_else(|| AppError::InvalidRecord(format!("strategy {} has no token symbol", record.id)))?;

    let inputs = record
        .targets
        .iter()
        .map(|t| target_input(record.id, t, bound.is_some()))
        .collect::<Result<Vec<_>, _>>()?;
    let quantity = bound.map(|h| h.quantity).unwrap_or_default();

    let kind = match bound {
        Some(h) => StrategyKind::Real {
            portfolio_id: record.portfolio_id.unwrap_or(portfolio_id),
            holding_id: h.id,
        },
        None => StrategyKind::Theoretical,
    };

    Ok(Strategy {
        id: record.id,
        name: record.name.unwrap_or_else(|| format!("{token_symbol} strategy")),
        token_symbol,
        kind,
        targets: resolve_tiers(quantity, &inputs),
    })
}

fn target_input(strategy_id: Uuid, record: &TargetRecord, has_holding: bool) -> Result<TierInput, AppError> {
    let target_type = TargetType::from_str(&record.target_type).ok_or_else(|| {
        AppError::InvalidRecord(format!(
            "strategy {strategy_id} tier {}: unknown target type {:?}",
            record.order, record.target_type
        ))
    })?;

    let sell = match (record.sell_percentage, record.sell_tokens) {
        (Some(_), Some(_)) => {
            return Err(AppError::InvalidRecord(format!(
                "strategy {strategy_id} tier {}: both sellPercentage and sellTokens given",
                record.order
            )))
        }
        (Some(pct), None) => SellSize::Percentage(pct),
        (None, Some(_)) if !has_holding => {
            return Err(AppError::InvalidRecord(format!(
                "strategy {strategy_id} tier {}: token-sized tiers need a bound holding",
                record.order
            )))
        }
        (None, Some(tokens)) => SellSize::Tokens(tokens),
        (None, None) => {
            return Err(AppError::InvalidRecord(format!(
                "strategy {strategy_id} tier {}: no sell size",
                record.order
            )))
        }
    };

    Ok(TierInput {
        order: record.order,
        target_type,
        target_value: record.target_value,
        sell,
    })
}
