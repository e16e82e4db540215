use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub carrier: CarrierSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Carrier-client tunables.
#[derive(Debug, Deserialize, Clone)]
pub struct CarrierSettings {
    /// Assumed bearer-token lifetime in hours. The carrier never returns
    /// an expiry, so this is a guessed window; lower it if shipment calls
    /// start hitting 401s mid-window.
    #[serde(default = "default_token_validity_hours")]
    pub token_validity_hours: i64,
    #[serde(default = "default_tracking_timeout_secs")]
    pub tracking_timeout_secs: u64,
    #[serde(default = "default_shipment_timeout_secs")]
    pub shipment_timeout_secs: u64,
    /// Override the tracking endpoint (tests, staging)
    pub tracking_url: Option<String>,
    /// Override the e-commerce API base URL
    pub ecom_base_url: Option<String>,
}

impl Default for CarrierSettings {
    fn default() -> Self {
        Self {
            token_validity_hours: default_token_validity_hours(),
            tracking_timeout_secs: default_tracking_timeout_secs(),
            shipment_timeout_secs: default_shipment_timeout_secs(),
            tracking_url: None,
            ecom_base_url: None,
        }
    }
}

fn default_token_validity_hours() -> i64 {
    23
}

fn default_tracking_timeout_secs() -> u64 {
    60
}

fn default_shipment_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // E.g. `COLIS__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("COLIS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
