use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::engine::projection::project;
use crate::engine::summary::summarize;
use crate::engine::validator::validate;
use crate::models::{
    ratio_pct, Forecast, GlobalSummary, Holding, HoldingForecast, PortfolioForecast, Strategy,
    StrategyAssignment, ValuationMode,
};

// ---------------------------------------------------------------------------
// Strategy matching
// ---------------------------------------------------------------------------

/// Strategies that can be applied to `holding`: same token, and either
/// theoretical or bound to this very holding.
pub fn compatible_strategies<'a>(holding: &Holding, strategies: &'a [Strategy]) -> Vec<&'a Strategy> {
    strategies
        .iter()
        .filter(|s| s.matches_token(&holding.token_symbol))
        .filter(|s| s.is_theoretical() || s.holding_id() == Some(holding.id))
        .collect()
}

/// Assign every holding the real strategy bound to it, or `none`.
pub fn default_assignments(
    holdings: &[Holding],
    strategies: &[Strategy],
) -> HashMap<Uuid, StrategyAssignment> {
    holdings
        .iter()
        .map(|h| {
            let bound = strategies.iter().find(|s| s.holding_id() == Some(h.id));
            (h.id, StrategyAssignment::from(bound.map(|s| s.id)))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Portfolio-wide forecast totals. See [`aggregate_detailed`].
pub fn aggregate(
    holdings: &[Holding],
    assignments: &HashMap<Uuid, StrategyAssignment>,
    strategies: &[Strategy],
) -> GlobalSummary {
    aggregate_detailed(holdings, assignments, strategies).summary
}

/// Forecast every holding and sum the results.
///
/// Holdings whose assignment resolves to a known strategy are simulated and
/// their leftover tokens valued at the market price. Every other holding
/// (no assignment, `none`, or a strategy that no longer exists) passes
/// through unsold: its invested amount counts as both invested and
/// remaining value.
pub fn aggregate_detailed(
    holdings: &[Holding],
    assignments: &HashMap<Uuid, StrategyAssignment>,
    strategies: &[Strategy],
) -> PortfolioForecast {
    let by_id: HashMap<Uuid, &Strategy> = strategies.iter().map(|s| (s.id, s)).collect();

    let lines: Vec<HoldingForecast> = holdings
        .iter()
        .map(|holding| {
            let assignment = assignments.get(&holding.id).copied().unwrap_or_default();
            let strategy = match assignment {
                StrategyAssignment::None => None,
                StrategyAssignment::Strategy(id) => {
                    let found = by_id.get(&id).copied();
                    if found.is_none() {
                        tracing::warn!(
                            holding_id = %holding.id,
                            strategy_id = %id,
                            "Assigned strategy not found, treating holding as unassigned"
                        );
                    }
                    found
                }
            };

            match strategy {
                Some(strategy) => priced_line(holding, strategy),
                None => pass_through_line(holding),
            }
        })
        .collect();

    let mut summary = GlobalSummary::default();
    for line in &lines {
        summary.total_invested = summary.total_invested.saturating_add(line.invested);
        summary.total_collected = summary.total_collected.saturating_add(line.collected);
        summary.total_remaining_value =
            summary.total_remaining_value.saturating_add(line.remaining_value);
    }
    summary.total_profit = summary
        .total_collected
        .saturating_add(summary.total_remaining_value)
        .saturating_sub(summary.total_invested);
    summary.return_percentage = ratio_pct(summary.total_profit, summary.total_invested);

    tracing::debug!(
        holdings = lines.len(),
        priced = lines.iter().filter(|l| l.strategy_id.is_some()).count(),
        total_invested = %summary.total_invested,
        total_profit = %summary.total_profit,
        "Portfolio forecast aggregated"
    );

    PortfolioForecast { lines, summary }
}

fn priced_line(holding: &Holding, strategy: &Strategy) -> HoldingForecast {
    if let Err(violation) = validate(strategy) {
        tracing::warn!(
            holding_id = %holding.id,
            strategy_id = %strategy.id,
            error = %violation,
            "Forecasting with an invalid strategy"
        );
    }
    if !strategy.matches_token(&holding.token_symbol) {
        tracing::warn!(
            holding_id = %holding.id,
            strategy_id = %strategy.id,
            holding_token = %holding.token_symbol,
            strategy_token = %strategy.token_symbol,
            "Strategy token does not match holding"
        );
    }
    if !holding.is_projectable() {
        tracing::warn!(
            holding_id = %holding.id,
            quantity = %holding.quantity,
            average_price = %holding.average_price,
            "Holding has no quantity or cost basis, nothing to project"
        );
    }

    let tiers = project(holding, strategy);
    let summary = summarize(holding, &tiers, ValuationMode::MarketPrice);

    HoldingForecast {
        holding_id: holding.id,
        token_symbol: holding.token_symbol.clone(),
        strategy_id: Some(strategy.id),
        invested: summary.total_invested,
        collected: summary.total_collected,
        remaining_value: summary.final_remaining_value,
        profit: summary.net_result,
        return_percentage: summary.return_percentage,
    }
}

fn pass_through_line(holding: &Holding) -> HoldingForecast {
    HoldingForecast {
        holding_id: holding.id,
        token_symbol: holding.token_symbol.clone(),
        strategy_id: None,
        invested: holding.invested_amount,
        collected: Decimal::ZERO,
        remaining_value: holding.invested_amount,
        profit: Decimal::ZERO,
        return_percentage: Decimal::ZERO,
    }
}

/// Build a named forecast snapshot for the external store.
///
/// Every holding appears in `applied_strategies`; holdings missing from
/// `assignments` are recorded as `none`.
pub fn build_forecast(
    name: &str,
    portfolio_id: Uuid,
    holdings: &[Holding],
    assignments: &HashMap<Uuid, StrategyAssignment>,
    strategies: &[Strategy],
    now: DateTime<Utc>,
) -> Forecast {
    let summary = aggregate(holdings, assignments, strategies);
    forecast_from_summary(name, portfolio_id, holdings, assignments, summary, now)
}

/// Same as [`build_forecast`] for callers that already aggregated.
pub fn forecast_from_summary(
    name: &str,
    portfolio_id: Uuid,
    holdings: &[Holding],
    assignments: &HashMap<Uuid, StrategyAssignment>,
    summary: GlobalSummary,
    now: DateTime<Utc>,
) -> Forecast {
    let applied_strategies: BTreeMap<Uuid, StrategyAssignment> = holdings
        .iter()
        .map(|h| (h.id, assignments.get(&h.id).copied().unwrap_or_default()))
        .collect();

    Forecast {
        id: Uuid::new_v4(),
        portfolio_id,
        name: name.to_string(),
        applied_strategies,
        summary,
        created_at: now,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
