use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;

use crate::engine::AlertDefaults;
use crate::models::ValuationMode;

const DEFAULT_FORECAST_NAME: &str = "Forecast";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Portfolio snapshot to forecast. A path given on the command line wins.
    pub snapshot_path: Option<PathBuf>,
    pub forecast_name: String,

    /// Basis for the unsold bag in per-strategy previews.
    pub preview_valuation: ValuationMode,
    pub alert_before_tp_pct: Decimal,

    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let valuation_raw =
            env::var("PREVIEW_VALUATION").unwrap_or_else(|_| "last_target".into());
        let preview_valuation = ValuationMode::from_str(&valuation_raw)
            .ok_or_else(|| anyhow::anyhow!("PREVIEW_VALUATION must be market, last_target or cost, got {valuation_raw:?}"))?;

        Ok(Self {
            snapshot_path: env::var("SNAPSHOT_PATH").ok().map(PathBuf::from),
            forecast_name: env::var("FORECAST_NAME")
                .unwrap_or_else(|_| DEFAULT_FORECAST_NAME.into()),

            preview_valuation,
            alert_before_tp_pct: env::var("ALERT_BEFORE_TP_PCT")
                .unwrap_or_else(|_| "-10".into())
                .parse()
                .unwrap_or(Decimal::from(-10)),

            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    pub fn alert_defaults(&self) -> AlertDefaults {
        AlertDefaults {
            before_tp_pct: self.alert_before_tp_pct,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            forecast_name: DEFAULT_FORECAST_NAME.into(),
            preview_valuation: ValuationMode::LastTarget,
            alert_before_tp_pct: Decimal::from(-10),
            log_json: false,
        }
    }
}
