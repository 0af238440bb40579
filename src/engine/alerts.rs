use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    percent_of, AlertEvent, BeforeTpTrigger, BeforeTpType, Holding, Strategy, TpAlert,
    TpReachedTrigger,
};

/// Trigger values proposed for tiers that have no alert yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertDefaults {
    /// Warning offset from the target price, in percent (default -10).
    pub before_tp_pct: Decimal,
}

impl Default for AlertDefaults {
    fn default() -> Self {
        Self {
            before_tp_pct: Decimal::from(-10),
        }
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Propose one alert per tier with the default triggers.
pub fn derive_alerts(holding: &Holding, strategy: &Strategy) -> Vec<TpAlert> {
    derive_alerts_with(holding, strategy, &AlertDefaults::default())
}

/// Propose one alert per tier.
///
/// Each tier is looked at in isolation against the original quantity, unlike
/// the chained projection: `remaining_value` is what the rest of the position
/// would be worth at this tier's price if only this tier had executed.
pub fn derive_alerts_with(
    holding: &Holding,
    strategy: &Strategy,
    defaults: &AlertDefaults,
) -> Vec<TpAlert> {
    if !holding.is_projectable() {
        return Vec::new();
    }

    let alerts: Option<Vec<TpAlert>> = strategy
        .ordered_targets()
        .into_iter()
        .map(|target| {
            let target_price = target.target_price(holding.average_price)?;
            let sell_quantity = percent_of(holding.quantity, target.sell_percentage);

            Some(TpAlert {
                tier_order: target.order,
                target_price,
                sell_quantity,
                projected_amount: target_price.checked_mul(sell_quantity)?,
                remaining_value: holding
                    .quantity
                    .saturating_sub(sell_quantity)
                    .checked_mul(target_price)?,
                before_tp: BeforeTpTrigger {
                    enabled: true,
                    value: defaults.before_tp_pct,
                    trigger_type: BeforeTpType::Percentage,
                },
                tp_reached: TpReachedTrigger { enabled: true },
            })
        })
        .collect();

    alerts.unwrap_or_else(|| {
        tracing::warn!(
            holding_id = %holding.id,
            strategy_id = %strategy.id,
            "Alert thresholds overflowed, no alerts proposed"
        );
        Vec::new()
    })
}

/// Merge freshly derived alerts with the ones already persisted.
///
/// Prices and quantities always come from the current strategy. Tiers that
/// already have an alert keep their stored triggers; default triggers are only
/// proposed for tiers without one. Alerts for tiers that no longer exist are
/// dropped.
pub fn propose_alerts(
    holding: &Holding,
    strategy: &Strategy,
    existing: &[TpAlert],
    defaults: &AlertDefaults,
) -> Vec<TpAlert> {
    derive_alerts_with(holding, strategy, defaults)
        .into_iter()
        .map(|derived| match existing.iter().find(|a| a.tier_order == derived.tier_order) {
            Some(stored) => TpAlert {
                before_tp: stored.before_tp.clone(),
                tp_reached: stored.tp_reached.clone(),
                ..derived
            },
            None => derived,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-tier edits
// ---------------------------------------------------------------------------

fn alert_mut(alerts: &mut [TpAlert], tier_order: u32) -> Option<&mut TpAlert> {
    alerts.iter_mut().find(|a| a.tier_order == tier_order)
}

/// Toggle the before-target warning of one tier. Returns false if the tier
/// has no alert.
pub fn set_before_tp(alerts: &mut [TpAlert], tier_order: u32, enabled: bool) -> bool {
    match alert_mut(alerts, tier_order) {
        Some(alert) => {
            alert.before_tp.enabled = enabled;
            true
        }
        None => false,
    }
}

pub fn set_before_tp_value(
    alerts: &mut [TpAlert],
    tier_order: u32,
    value: Decimal,
    trigger_type: BeforeTpType,
) -> bool {
    match alert_mut(alerts, tier_order) {
        Some(alert) => {
            alert.before_tp.value = value;
            alert.before_tp.trigger_type = trigger_type;
            true
        }
        None => false,
    }
}

pub fn set_tp_reached(alerts: &mut [TpAlert], tier_order: u32, enabled: bool) -> bool {
    match alert_mut(alerts, tier_order) {
        Some(alert) => {
            alert.tp_reached.enabled = enabled;
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Enabled triggers of `alert` that `price` has crossed.
pub fn evaluate_alert(alert: &TpAlert, price: Decimal) -> Vec<AlertEvent> {
    let mut events = Vec::new();

    if alert.before_tp.enabled {
        let trigger_price = alert.before_tp.trigger_price(alert.target_price);
        // The warning is only meaningful until the target itself is hit.
        if price >= trigger_price && price < alert.target_price {
            events.push(AlertEvent::ApproachingTarget {
                tier_order: alert.tier_order,
                trigger_price,
                price,
            });
        }
    }

    if alert.tp_reached.enabled && price >= alert.target_price {
        events.push(AlertEvent::TargetReached {
            tier_order: alert.tier_order,
            target_price: alert.target_price,
            price,
        });
    }

    events
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
