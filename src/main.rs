use std::path::PathBuf;

use tp_planner::config::AppConfig;
use tp_planner::report::build_report;
use tp_planner::snapshot::load_snapshot;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_json);

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.snapshot_path.clone())
        .ok_or_else(|| anyhow::anyhow!("No snapshot given: pass a path or set SNAPSHOT_PATH"))?;

    tracing::info!(path = %path.display(), "Loading portfolio snapshot");
    let snapshot = load_snapshot(&path)?;

    let report = build_report(&snapshot, &config, chrono::Utc::now());

    for issue in &report.strategy_issues {
        tracing::warn!(
            strategy_id = %issue.strategy_id,
            tier_index = ?issue.tier_index,
            "Invalid strategy: {}",
            issue.message
        );
    }

    tracing::info!(
        holdings = report.lines.len(),
        previews = report.previews.len(),
        total_invested = %report.forecast.summary.total_invested,
        total_profit = %report.forecast.summary.total_profit,
        return_pct = %report.forecast.summary.return_percentage.round_dp(2),
        "Forecast built"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // stdout carries the report
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
