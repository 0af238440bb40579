pub mod aggregator;
pub mod alerts;
pub mod projection;
pub mod summary;
pub mod validator;

pub use aggregator::{
    aggregate, aggregate_detailed, build_forecast, compatible_strategies, default_assignments,
    forecast_from_summary,
};
pub use alerts::{derive_alerts, derive_alerts_with, evaluate_alert, propose_alerts, AlertDefaults};
pub use projection::{project, resolve_tiers, SellSize, TierInput};
pub use summary::{preview, summarize};
pub use validator::{validate, StrategyViolation};
