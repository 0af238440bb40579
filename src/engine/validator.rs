use std::collections::HashSet;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{ProfitTarget, Strategy, TargetType};

/// First structural rule a strategy's tier list breaks.
/// `tier_index` is the position in the stored tier list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyViolation {
    #[error("strategy has no profit targets")]
    NoTargets,

    #[error("tier {tier_index}: sell percentage {value} is outside 0-100")]
    SellPercentageOutOfRange { tier_index: usize, value: Decimal },

    #[error("tier {tier_index}: cumulative sell percentage {total}% exceeds 100%")]
    SellBudgetExceeded { tier_index: usize, total: Decimal },

    #[error("tier {tier_index}: order {order} is used by another tier")]
    DuplicateOrder { tier_index: usize, order: u32 },

    #[error("tier {tier_index}: order {found} breaks the sequence, expected {expected}")]
    OrderGap {
        tier_index: usize,
        expected: u32,
        found: u32,
    },

    #[error("no tier at index {tier_index}")]
    UnknownTier { tier_index: usize },
}

impl StrategyViolation {
    pub fn tier_index(&self) -> Option<usize> {
        match self {
            StrategyViolation::NoTargets => None,
            StrategyViolation::SellPercentageOutOfRange { tier_index, .. }
            | StrategyViolation::SellBudgetExceeded { tier_index, .. }
            | StrategyViolation::DuplicateOrder { tier_index, .. }
            | StrategyViolation::OrderGap { tier_index, .. }
            | StrategyViolation::UnknownTier { tier_index } => Some(*tier_index),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Run all structural checks on a strategy. Returns Ok(()) if all pass.
pub fn validate(strategy: &Strategy) -> Result<(), StrategyViolation> {
    validate_targets(&strategy.targets)
}

/// Checks, in order:
/// 1. the list is not empty
/// 2. every sell percentage is within 0-100
/// 3. the sell percentages add up to at most 100
/// 4. orders are unique and contiguous from 1
pub fn validate_targets(targets: &[ProfitTarget]) -> Result<(), StrategyViolation> {
    if targets.is_empty() {
        return Err(StrategyViolation::NoTargets);
    }

    for (tier_index, target) in targets.iter().enumerate() {
        let value = target.sell_percentage;
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(StrategyViolation::SellPercentageOutOfRange { tier_index, value });
        }
    }

    let mut total = Decimal::ZERO;
    for (tier_index, target) in targets.iter().enumerate() {
        total += target.sell_percentage;
        if total > Decimal::ONE_HUNDRED {
            return Err(StrategyViolation::SellBudgetExceeded { tier_index, total });
        }
    }

    check_order_sequence(targets)
}

fn check_order_sequence(targets: &[ProfitTarget]) -> Result<(), StrategyViolation> {
    let mut seen = HashSet::with_capacity(targets.len());
    for (tier_index, target) in targets.iter().enumerate() {
        if !seen.insert(target.order) {
            return Err(StrategyViolation::DuplicateOrder {
                tier_index,
                order: target.order,
            });
        }
    }

    // Orders are unique here, so the sequence is contiguous iff all fall in 1..=n.
    let n = targets.len() as u32;
    if let Some((tier_index, target)) = targets
        .iter()
        .enumerate()
        .find(|(_, t)| t.order == 0 || t.order > n)
    {
        let expected = (1..=n).find(|o| !seen.contains(o)).unwrap_or(n + 1);
        return Err(StrategyViolation::OrderGap {
            tier_index,
            expected,
            found: target.order,
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Edit-time budget clamping
// ---------------------------------------------------------------------------

/// Sell budget left for one tier: 100 minus every other tier's share.
/// `except = None` gives the budget for a tier that does not exist yet.
pub fn headroom(targets: &[ProfitTarget], except: Option<usize>) -> Decimal {
    let others: Decimal = targets
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != except)
        .map(|(_, t)| t.sell_percentage)
        .sum();
    (Decimal::ONE_HUNDRED - others).max(Decimal::ZERO)
}

/// Value actually accepted when a caller proposes `proposed` for tier `index`.
pub fn clamp_sell_percentage(targets: &[ProfitTarget], index: usize, proposed: Decimal) -> Decimal {
    proposed
        .max(Decimal::ZERO)
        .min(headroom(targets, Some(index)))
}

/// Apply a sell percentage edit, clamped to the remaining headroom.
/// Returns the accepted value.
pub fn set_sell_percentage(
    targets: &mut [ProfitTarget],
    index: usize,
    proposed: Decimal,
) -> Result<Decimal, StrategyViolation> {
    if index >= targets.len() {
        return Err(StrategyViolation::UnknownTier { tier_index: index });
    }

    let accepted = clamp_sell_percentage(targets, index, proposed);
    if accepted != proposed {
        tracing::debug!(
            tier_index = index,
            proposed = %proposed,
            accepted = %accepted,
            "Sell percentage clamped to remaining headroom"
        );
    }
    targets[index].sell_percentage = accepted;
    Ok(accepted)
}

/// Append a tier at the end of the execution sequence. The sell share is
/// clamped to what the existing tiers leave over. Returns the accepted share.
pub fn add_tier(
    targets: &mut Vec<ProfitTarget>,
    target_type: TargetType,
    target_value: Decimal,
    proposed_sell: Decimal,
) -> Decimal {
    let accepted = proposed_sell
        .max(Decimal::ZERO)
        .min(headroom(targets, None));
    targets.push(ProfitTarget {
        order: targets.len() as u32 + 1,
        target_type,
        target_value,
        sell_percentage: accepted,
    });
    accepted
}

/// Remove a tier and close the gap it leaves in the order sequence.
pub fn remove_tier(
    targets: &mut Vec<ProfitTarget>,
    index: usize,
) -> Result<ProfitTarget, StrategyViolation> {
    if index >= targets.len() {
        return Err(StrategyViolation::UnknownTier { tier_index: index });
    }
    let removed = targets.remove(index);
    renumber(targets);
    Ok(removed)
}

/// Reassign orders 1..=n following the current execution order.
/// Ties keep their list position.
pub fn renumber(targets: &mut [ProfitTarget]) {
    let mut by_order: Vec<usize> = (0..targets.len()).collect();
    by_order.sort_by_key(|&i| (targets[i].order, i));
    for (rank, i) in by_order.into_iter().enumerate() {
        targets[i].order = rank as u32 + 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(order: u32, sell: i64) -> ProfitTarget {
        ProfitTarget {
            order,
            target_type: TargetType::Percentage,
            target_value: Decimal::from(50),
            sell_percentage: Decimal::from(sell),
        }
    }

    #[test]
    fn test_valid_targets_pass() {
        let targets = vec![tier(1, 50), tier(2, 30)];
        assert!(validate_targets(&targets).is_ok());
    }

    #[test]
    fn test_residual_bag_is_allowed() {
        let targets = vec![tier(1, 10)];
        assert!(validate_targets(&targets).is_ok());
    }

    #[test]
    fn test_empty_targets_rejected() {
        assert_eq!(validate_targets(&[]), Err(StrategyViolation::NoTargets));
    }

    #[test]
    fn test_sell_percentage_out_of_range() {
        let targets = vec![tier(1, 20), tier(2, -5)];
        let err = validate_targets(&targets).unwrap_err();
        assert!(matches!(err, StrategyViolation::SellPercentageOutOfRange { tier_index: 1, .. }));
        assert_eq!(err.tier_index(), Some(1));
    }

    #[test]
    fn test_budget_exceeded_reports_first_overflowing_tier() {
        let targets = vec![tier(1, 60), tier(2, 50), tier(3, 10)];
        let err = validate_targets(&targets).unwrap_err();
        assert_eq!(
            err,
            StrategyViolation::SellBudgetExceeded {
                tier_index: 1,
                total: Decimal::from(110),
            }
        );
    }

    #[test]
    fn test_duplicate_order() {
        let targets = vec![tier(1, 10), tier(1, 10)];
        assert!(matches!(
            validate_targets(&targets),
            Err(StrategyViolation::DuplicateOrder { tier_index: 1, order: 1 })
        ));
    }

    #[test]
    fn test_order_gap() {
        let targets = vec![tier(1, 10), tier(3, 10)];
        assert_eq!(
            validate_targets(&targets),
            Err(StrategyViolation::OrderGap {
                tier_index: 1,
                expected: 2,
                found: 3,
            })
        );
    }

    #[test]
    fn test_order_must_start_at_one() {
        let targets = vec![tier(0, 10), tier(1, 10)];
        assert!(matches!(
            validate_targets(&targets),
            Err(StrategyViolation::OrderGap { tier_index: 0, expected: 2, found: 0 })
        ));
    }

    #[test]
    fn test_unsorted_but_contiguous_orders_pass() {
        let targets = vec![tier(2, 10), tier(1, 10)];
        assert!(validate_targets(&targets).is_ok());
    }

    #[test]
    fn test_clamp_to_headroom() {
        // Tier 1 holds 50, so tier 2 can take at most 50.
        let mut targets = vec![tier(1, 50), tier(2, 0)];
        let accepted = set_sell_percentage(&mut targets, 1, Decimal::from(80)).unwrap();
        assert_eq!(accepted, Decimal::from(50));
        assert_eq!(targets[1].sell_percentage, Decimal::from(50));
        assert!(validate_targets(&targets).is_ok());
    }

    #[test]
    fn test_clamp_ignores_own_previous_value() {
        let mut targets = vec![tier(1, 50), tier(2, 40)];
        let accepted = set_sell_percentage(&mut targets, 1, Decimal::from(45)).unwrap();
        assert_eq!(accepted, Decimal::from(45));
    }

    #[test]
    fn test_negative_proposal_clamped_to_zero() {
        let mut targets = vec![tier(1, 50)];
        let accepted = set_sell_percentage(&mut targets, 0, Decimal::from(-20)).unwrap();
        assert_eq!(accepted, Decimal::ZERO);
    }

    #[test]
    fn test_set_unknown_tier() {
        let mut targets = vec![tier(1, 50)];
        assert_eq!(
            set_sell_percentage(&mut targets, 3, Decimal::from(10)),
            Err(StrategyViolation::UnknownTier { tier_index: 3 })
        );
    }

    #[test]
    fn test_add_tier_clamps_and_appends() {
        let mut targets = vec![tier(1, 70)];
        let accepted = add_tier(&mut targets, TargetType::Price, Decimal::from(300), Decimal::from(50));
        assert_eq!(accepted, Decimal::from(30));
        assert_eq!(targets[1].order, 2);
        assert!(validate_targets(&targets).is_ok());
    }

    #[test]
    fn test_remove_tier_renumbers() {
        let mut targets = vec![tier(1, 10), tier(2, 20), tier(3, 30)];
        let removed = remove_tier(&mut targets, 1).unwrap();
        assert_eq!(removed.sell_percentage, Decimal::from(20));
        let orders: Vec<u32> = targets.iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert_eq!(targets[1].sell_percentage, Decimal::from(30));
    }

    #[test]
    fn test_headroom_never_negative() {
        let targets = vec![tier(1, 80), tier(2, 40)];
        assert_eq!(headroom(&targets, None), Decimal::ZERO);
    }
}
