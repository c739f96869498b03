use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Provider {
    pub base_url: String,
    pub api_key: String,
    pub output_size: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub provider: Provider,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Self::load(&config_dir, &run_mode)
    }

    /// Defaults, then `{config_dir}/{run_mode}.*` if present, then `STOCK_SIM__*` variables
    pub fn load(config_dir: &str, run_mode: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api.host", "0.0.0.0")?
            .set_default("api.port", 3001)?
            .set_default("provider.base_url", "https://www.alphavantage.co")?
            .set_default("provider.api_key", "demo")?
            .set_default("provider.output_size", "full")?
            .set_default("provider.timeout_secs", 30)?
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            .add_source(
                Environment::with_prefix("STOCK_SIM")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(api_key) = std::env::var("ALPHAVANTAGE_API_KEY") {
            builder = builder.set_override("provider.api_key", api_key)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
