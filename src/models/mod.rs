pub mod alert;
pub mod forecast;
pub mod holding;
pub mod projection;
pub mod strategy;

pub use alert::{AlertEvent, BeforeTpTrigger, BeforeTpType, TpAlert, TpReachedTrigger};
pub use forecast::{Forecast, GlobalSummary, HoldingForecast, PortfolioForecast, StrategyAssignment};
pub use holding::Holding;
pub use projection::{PositionSummary, TierResult, ValuationMode};
pub use strategy::{ProfitTarget, Strategy, StrategyKind, TargetType};

use rust_decimal::Decimal;

/// `value * pct / 100`, saturating instead of overflowing.
pub(crate) fn percent_of(value: Decimal, pct: Decimal) -> Decimal {
    match value.checked_mul(pct) {
        Some(product) => product / Decimal::ONE_HUNDRED,
        None => (value / Decimal::ONE_HUNDRED).saturating_mul(pct),
    }
}

/// `part / whole * 100`, or zero when `whole` is not positive.
pub(crate) fn ratio_pct(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .map_or(Decimal::ZERO, |r| r.saturating_mul(Decimal::ONE_HUNDRED))
}
