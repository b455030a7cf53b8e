//! Application configuration loaded from environment variables.

use std::time::Duration;

use domain::TaxPolicy;

/// Shared secret accepted by `POST /api/auth` when `API_KEY` is unset.
pub const DEMO_API_KEY: &str = "ecount_api_key_12345";

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `API_KEY`: shared secret exchanged for session tokens
/// - `TAX_RATE_BPS`: tax rate for new orders in basis points (default: `1000`)
/// - `SEED_DEMO_DATA`: load the demo vendors, items and orders (default: `true`)
/// - `SESSION_TTL_SECS`: how long an issued token stays valid (default: `3600`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub api_key: String,
    pub tax_rate_bps: u32,
    pub seed_demo_data: bool,
    pub session_ttl_secs: u64,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: parsed_var("PORT").unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            api_key: std::env::var("API_KEY").unwrap_or(defaults.api_key),
            tax_rate_bps: parsed_var("TAX_RATE_BPS").unwrap_or(defaults.tax_rate_bps),
            seed_demo_data: std::env::var("SEED_DEMO_DATA")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.seed_demo_data),
            session_ttl_secs: parsed_var("SESSION_TTL_SECS").unwrap_or(defaults.session_ttl_secs),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the tax policy applied to newly created orders.
    pub fn tax_policy(&self) -> TaxPolicy {
        TaxPolicy::from_basis_points(self.tax_rate_bps)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            api_key: DEMO_API_KEY.to_string(),
            tax_rate_bps: TaxPolicy::STANDARD_RATE_BPS,
            seed_demo_data: true,
            session_ttl_secs: 3600,
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
