use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::validator::clamp_sell_percentage;
use crate::models::{percent_of, ratio_pct, Holding, ProfitTarget, Strategy, TargetType, TierResult};

// ---------------------------------------------------------------------------
// Tier inputs
// ---------------------------------------------------------------------------

/// How much of the position a tier sells, as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum SellSize {
    /// Share of the original quantity, 0-100.
    Percentage(Decimal),
    /// Absolute number of tokens.
    Tokens(Decimal),
}

/// A tier as entered, before sell sizes are normalized to percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierInput {
    pub order: u32,
    pub target_type: TargetType,
    pub target_value: Decimal,
    pub sell: SellSize,
}

/// Percentage of `quantity` that `tokens` represents. Zero for an empty position.
pub fn sell_tokens_to_percentage(quantity: Decimal, tokens: Decimal) -> Decimal {
    ratio_pct(tokens, quantity)
}

/// Tokens sold when selling `percentage` of `quantity`.
pub fn sell_percentage_to_tokens(quantity: Decimal, percentage: Decimal) -> Decimal {
    percent_of(quantity, percentage)
}

/// Normalize entered tiers into profit targets, converting token counts into
/// percentages of `quantity` so both input modes share one validation and
/// projection path.
///
/// Converted percentages are clamped, in list order, to the headroom the
/// earlier tiers leave, so token tiers adding up to the whole position land
/// on exactly 100% despite division rounding.
pub fn resolve_tiers(quantity: Decimal, inputs: &[TierInput]) -> Vec<ProfitTarget> {
    let mut targets: Vec<ProfitTarget> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let sell_percentage = match input.sell {
            SellSize::Percentage(pct) => pct,
            SellSize::Tokens(tokens) => clamp_sell_percentage(
                &targets,
                targets.len(),
                sell_tokens_to_percentage(quantity, tokens),
            ),
        };
        targets.push(ProfitTarget {
            order: input.order,
            target_type: input.target_type,
            target_value: input.target_value,
            sell_percentage,
        });
    }
    targets
}

// ---------------------------------------------------------------------------
// Chained projection
// ---------------------------------------------------------------------------

/// Simulate a strategy's tiers against a holding, in ascending order.
///
/// Each tier sells its share of the *original* quantity, capped at what the
/// earlier tiers left. Returns an empty list for a holding with no quantity
/// or no cost basis.
pub fn project(holding: &Holding, strategy: &Strategy) -> Vec<TierResult> {
    project_targets(holding, &strategy.ordered_targets())
}

/// Same as [`project`] over a pre-sorted tier list.
///
/// A tier whose figures overflow `Decimal` makes the whole projection
/// meaningless, so the result is empty in that case too.
pub fn project_targets(holding: &Holding, targets: &[&ProfitTarget]) -> Vec<TierResult> {
    if !holding.is_projectable() {
        return Vec::new();
    }

    let mut remaining = holding.quantity;
    let results: Option<Vec<TierResult>> = targets
        .iter()
        .map(|target| project_tier(holding, target, &mut remaining))
        .collect();

    results.unwrap_or_else(|| {
        tracing::warn!(
            holding_id = %holding.id,
            quantity = %holding.quantity,
            average_price = %holding.average_price,
            "Projection overflowed, skipping holding"
        );
        Vec::new()
    })
}

fn project_tier(holding: &Holding, target: &ProfitTarget, remaining: &mut Decimal) -> Option<TierResult> {
    let target_price = target.target_price(holding.average_price)?;
    let tokens_sold = percent_of(holding.quantity, target.sell_percentage)
        .max(Decimal::ZERO)
        .min(*remaining);
    let amount_collected = tokens_sold.checked_mul(target_price)?;
    *remaining -= tokens_sold;

    Some(TierResult {
        order: target.order,
        target_price,
        tokens_sold,
        amount_collected,
        remaining_tokens: *remaining,
        remaining_valuation_at_target: remaining.checked_mul(target_price)?,
        remaining_valuation_at_cost: remaining.checked_mul(holding.average_price)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
