use rust_decimal::Decimal;

use crate::engine::projection::project;
use crate::models::{ratio_pct, Holding, PositionSummary, Strategy, TierResult, ValuationMode};

/// Fold tier projections into the net result for one holding.
///
/// Tokens left after the last tier are valued at the basis the caller asks
/// for. `LastTarget` with no tiers falls back to the market price, since there
/// is no configured target to value at.
pub fn summarize(holding: &Holding, tiers: &[TierResult], valuation: ValuationMode) -> PositionSummary {
    let total_invested = holding.cost_basis();
    let total_collected = tiers
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount_collected));

    let last = tiers.last();
    let final_remaining_tokens = last.map_or(holding.quantity, |t| t.remaining_tokens);

    let basis = match (valuation, last) {
        (ValuationMode::MarketPrice, _) | (ValuationMode::LastTarget, None) => holding.market_price(),
        (ValuationMode::LastTarget, Some(t)) => t.target_price,
        (ValuationMode::CostBasis, _) => holding.average_price,
    };
    let final_remaining_value = final_remaining_tokens.saturating_mul(basis);

    let net_result = total_collected
        .saturating_add(final_remaining_value)
        .saturating_sub(total_invested);

    PositionSummary {
        total_invested,
        total_collected,
        net_result,
        return_percentage: ratio_pct(net_result, total_invested),
        final_remaining_tokens,
        final_remaining_value,
        valuation,
    }
}

/// Project and summarize in one step, for the strategy-authoring screen.
pub fn preview(holding: &Holding, strategy: &Strategy, valuation: ValuationMode) -> PositionSummary {
    let tiers = project(holding, strategy);
    summarize(holding, &tiers, valuation)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProfitTarget, StrategyKind, TargetType};
    use uuid::Uuid;

    fn holding(current_price: Option<i64>) -> Holding {
        Holding {
            id: Uuid::new_v4(),
            portfolio_id: Uuid::new_v4(),
            token_symbol: "SOL".into(),
            quantity: Decimal::from(10),
            average_price: Decimal::from(100),
            current_price: current_price.map(Decimal::from),
            invested_amount: Decimal::from(1_000),
        }
    }

    fn strategy(sells: &[(i64, i64)]) -> Strategy {
        Strategy {
            id: Uuid::new_v4(),
            name: "ladder".into(),
            token_symbol: "SOL".into(),
            kind: StrategyKind::Theoretical,
            targets: sells
                .iter()
                .enumerate()
                .map(|(i, (gain, sell))| ProfitTarget {
                    order: i as u32 + 1,
                    target_type: TargetType::Percentage,
                    target_value: Decimal::from(*gain),
                    sell_percentage: Decimal::from(*sell),
                })
                .collect(),
        }
    }

    #[test]
    fn test_fully_sold_ladder() {
        let s = preview(&holding(None), &strategy(&[(50, 50), (100, 50)]), ValuationMode::MarketPrice);
        assert_eq!(s.total_invested, Decimal::from(1_000));
        assert_eq!(s.total_collected, Decimal::from(1_750));
        assert_eq!(s.final_remaining_tokens, Decimal::ZERO);
        assert_eq!(s.net_result, Decimal::from(750));
        assert_eq!(s.return_percentage, Decimal::from(75));
    }

    #[test]
    fn test_remaining_bag_valuation_modes() {
        let h = holding(Some(120));
        let st = strategy(&[(50, 50)]);

        // 5 tokens left after selling 5 at 150.
        let market = preview(&h, &st, ValuationMode::MarketPrice);
        assert_eq!(market.final_remaining_value, Decimal::from(600));
        assert_eq!(market.net_result, Decimal::from(350));

        let target = preview(&h, &st, ValuationMode::LastTarget);
        assert_eq!(target.final_remaining_value, Decimal::from(750));
        assert_eq!(target.net_result, Decimal::from(500));

        let cost = preview(&h, &st, ValuationMode::CostBasis);
        assert_eq!(cost.final_remaining_value, Decimal::from(500));
        assert_eq!(cost.return_percentage, Decimal::from(25));
    }

    #[test]
    fn test_market_mode_falls_back_to_average_price() {
        let s = preview(&holding(None), &strategy(&[(50, 50)]), ValuationMode::MarketPrice);
        assert_eq!(s.final_remaining_value, Decimal::from(500));
    }

    #[test]
    fn test_no_tiers_keeps_whole_position() {
        let s = summarize(&holding(Some(90)), &[], ValuationMode::LastTarget);
        assert_eq!(s.final_remaining_tokens, Decimal::from(10));
        assert_eq!(s.final_remaining_value, Decimal::from(900));
        assert_eq!(s.total_collected, Decimal::ZERO);
        assert_eq!(s.net_result, Decimal::from(-100));
        assert_eq!(s.return_percentage, Decimal::from(-10));
    }

    #[test]
    fn test_huge_position_saturates_instead_of_panicking() {
        let mut h = holding(Some(10_000_000));
        h.quantity = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
        let s = summarize(&h, &[], ValuationMode::MarketPrice);
        assert_eq!(s.final_remaining_value, Decimal::MAX);
        assert_eq!(s.total_invested, h.quantity * h.average_price);
    }

    #[test]
    fn test_zero_invested_gives_zero_return() {
        let mut h = holding(Some(5));
        h.average_price = Decimal::ZERO;
        let s = summarize(&h, &[], ValuationMode::MarketPrice);
        assert_eq!(s.total_invested, Decimal::ZERO);
        assert_eq!(s.return_percentage, Decimal::ZERO);
    }
}
