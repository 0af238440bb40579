use rust_decimal::Decimal;
use uuid::Uuid;

use tp_planner::models::{Holding, ProfitTarget, Strategy, StrategyKind, TargetType};

/// Build a holding whose invested amount equals its cost basis.
#[allow(dead_code)]
pub fn holding(symbol: &str, quantity: Decimal, average_price: Decimal) -> Holding {
    Holding {
        id: Uuid::new_v4(),
        portfolio_id: Uuid::nil(),
        token_symbol: symbol.into(),
        quantity,
        average_price,
        current_price: None,
        invested_amount: quantity * average_price,
    }
}

/// Percentage-above-cost tier.
#[allow(dead_code)]
pub fn pct_tier(order: u32, gain_pct: i64, sell_pct: i64) -> ProfitTarget {
    ProfitTarget {
        order,
        target_type: TargetType::Percentage,
        target_value: Decimal::from(gain_pct),
        sell_percentage: Decimal::from(sell_pct),
    }
}

#[allow(dead_code)]
pub fn theoretical(symbol: &str, targets: Vec<ProfitTarget>) -> Strategy {
    Strategy {
        id: Uuid::new_v4(),
        name: format!("{symbol} ladder"),
        token_symbol: symbol.into(),
        kind: StrategyKind::Theoretical,
        targets,
    }
}

#[allow(dead_code)]
pub fn bound_to(holding: &Holding, targets: Vec<ProfitTarget>) -> Strategy {
    Strategy {
        id: Uuid::new_v4(),
        name: format!("{} exits", holding.token_symbol),
        token_symbol: holding.token_symbol.clone(),
        kind: StrategyKind::Real {
            portfolio_id: holding.portfolio_id,
            holding_id: holding.id,
        },
        targets,
    }
}
