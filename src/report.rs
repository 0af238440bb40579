use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::engine::{
    aggregate_detailed, forecast_from_summary, project, propose_alerts, summarize, validate,
};
use crate::models::{Forecast, HoldingForecast, PositionSummary, TierResult, TpAlert};
use crate::snapshot::PortfolioSnapshot;

#[derive(Debug, Serialize)]
pub struct StrategyIssue {
    pub strategy_id: Uuid,
    pub tier_index: Option<usize>,
    pub message: String,
}

/// Authoring-view breakdown of one holding under its assigned strategy.
#[derive(Debug, Serialize)]
pub struct HoldingPreview {
    pub holding_id: Uuid,
    pub strategy_id: Uuid,
    pub tiers: Vec<TierResult>,
    pub summary: PositionSummary,
    pub alerts: Vec<TpAlert>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub forecast: Forecast,
    pub lines: Vec<HoldingForecast>,
    pub previews: Vec<HoldingPreview>,
    pub strategy_issues: Vec<StrategyIssue>,
}

/// Run the whole engine over a snapshot.
pub fn build_report(snapshot: &PortfolioSnapshot, config: &AppConfig, now: DateTime<Utc>) -> Report {
    let strategy_issues: Vec<StrategyIssue> = snapshot
        .strategies
        .iter()
        .filter_map(|s| {
            validate(s).err().map(|violation| StrategyIssue {
                strategy_id: s.id,
                tier_index: violation.tier_index(),
                message: violation.to_string(),
            })
        })
        .collect();

    let detailed = aggregate_detailed(&snapshot.holdings, &snapshot.assignments, &snapshot.strategies);
    let forecast = forecast_from_summary(
        &config.forecast_name,
        snapshot.portfolio_id,
        &snapshot.holdings,
        &snapshot.assignments,
        detailed.summary.clone(),
        now,
    );

    let alert_defaults = config.alert_defaults();
    let previews = detailed
        .lines
        .iter()
        .filter_map(|line| {
            let strategy_id = line.strategy_id?;
            let holding = snapshot.holdings.iter().find(|h| h.id == line.holding_id)?;
            let strategy = snapshot.strategies.iter().find(|s| s.id == strategy_id)?;

            let tiers = project(holding, strategy);
            let summary = summarize(holding, &tiers, config.preview_valuation);
            let existing = snapshot
                .alerts
                .get(&holding.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let alerts = propose_alerts(holding, strategy, existing, &alert_defaults);

            Some(HoldingPreview {
                holding_id: holding.id,
                strategy_id,
                tiers,
                summary,
                alerts,
            })
        })
        .collect();

    Report {
        forecast,
        lines: detailed.lines,
        previews,
        strategy_issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::parse_snapshot;
    use rust_decimal::Decimal;

    #[test]
    fn test_report_over_mixed_snapshot() {
        let snapshot = parse_snapshot(
            r#"{
                "portfolioId": "7f1e8a52-6a1c-4c52-9d36-4f0e2b8a9c01",
                "holdings": [
                    { "id": "0b6f1f7c-2f8e-4a8f-8a43-3e7b9e0f5a11", "symbol": "ETH", "quantity": 10, "averagePrice": 100 },
                    { "id": "c3a0d6b2-91d4-4b3b-8a5e-0d7f63b1e222", "symbol": "BTC", "quantity": 1, "averagePrice": 500 }
                ],
                "strategies": [
                    {
                        "id": "5e9b8f0a-1d2c-4e3f-9a8b-7c6d5e4f3a21",
                        "holdingId": "0b6f1f7c-2f8e-4a8f-8a43-3e7b9e0f5a11",
                        "targets": [
                            { "order": 1, "targetType": "percentage", "targetValue": 50, "sellPercentage": 50 },
                            { "order": 2, "targetType": "percentage", "targetValue": 100, "sellPercentage": 50 }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let report = build_report(&snapshot, &AppConfig::default(), Utc::now());
        assert!(report.strategy_issues.is_empty());
        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.previews.len(), 1);
        assert_eq!(report.previews[0].alerts.len(), 2);
        assert_eq!(report.previews[0].summary.net_result, Decimal::from(750));
        assert_eq!(report.forecast.summary.total_invested, Decimal::from(1_500));
        assert_eq!(report.forecast.summary.total_profit, Decimal::from(750));
        let line_total: Decimal = report.lines.iter().map(|l| l.invested).sum();
        assert_eq!(line_total, report.forecast.summary.total_invested);
    }
}
