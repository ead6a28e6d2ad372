use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct BackendCfg {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataCfg {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesCfg {
    pub upload_url: String,
    pub upload_preset: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionCfg {
    pub path: String,
    pub refresh_interval_sec: u64,
}

impl SessionCfg {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_sec)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradeCfg {
    pub reload_delay_sec: u64,
}

impl TradeCfg {
    pub fn reload_delay(&self) -> Duration {
        Duration::from_secs(self.reload_delay_sec)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityCfg {
    pub log_json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: BackendCfg,
    pub market_data: MarketDataCfg,
    pub images: ImagesCfg,
    pub session: SessionCfg,
    pub trade: TradeCfg,
    pub observability: ObservabilityCfg,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name("config.example").required(false))
            .add_source(config::Environment::default().separator("__"));

        if let Ok(path) = std::env::var("PAPERTRADE_CONFIG") {
            builder = builder.add_source(config::File::with_name(&path).required(true));
        }

        builder
            .build()
            .context("failed to build config")?
            .try_deserialize()
            .context("failed to deserialize config")
    }
}
