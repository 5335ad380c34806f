//! Environment-driven configuration.

use std::env;

/// IBEX 35 constituents tracked by default.
pub const IBEX35_SYMBOLS: &[&str] = &[
    "TEF.MC", "IBE.MC", "ITX.MC", "SAN.MC", "BBVA.MC", "CABK.MC", "CLNX.MC",
    "ENG.MC", "FER.MC", "GRF.MC", "IAG.MC", "MAP.MC", "MRL.MC", "REP.MC",
    "TRE.MC", "VIS.MC", "ACX.MC", "AMS.MC", "AENA.MC", "ALM.MC", "CIE.MC",
    "COL.MC", "ELE.MC", "ENR.MC", "MEL.MC", "PHM.MC", "RED.MC", "SGRE.MC",
    "SOL.MC", "NTGY.MC", "SAB.MC",
];

/// Lookback window handed to the market data provider, roughly six months
/// of calendar days.
pub const LOOKBACK_DAYS: u32 = 183;

/// Deployment environment, used to pick the log formatter.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub provider_base_url: String,
    pub symbols: Vec<String>,
    pub lookback_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            provider_base_url: "https://query1.finance.yahoo.com".to_string(),
            symbols: IBEX35_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            lookback_days: LOOKBACK_DAYS,
        }
    }
}

impl Config {
    /// Build the configuration from environment variables, falling back to
    /// defaults. `SYMBOLS` is a comma-separated universe override.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let provider_base_url =
            env::var("MARKET_DATA_BASE_URL").unwrap_or(defaults.provider_base_url);

        let symbols = env::var("SYMBOLS")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|list: &Vec<String>| !list.is_empty())
            .unwrap_or(defaults.symbols);

        Self {
            port,
            provider_base_url,
            symbols,
            lookback_days: defaults.lookback_days,
        }
    }
}
