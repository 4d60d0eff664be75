use crate::domain::range::RangeToken;
use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub api: ApiSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_range")]
    pub default_range: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_range: default_range(),
        }
    }
}

impl DashboardSettings {
    pub fn initial_range(&self) -> anyhow::Result<RangeToken> {
        Ok(self.default_range.parse()?)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_range() -> String {
    RangeToken::Today.to_string()
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("CATDASH").separator("__"))
        .build()?;

    settings
        .try_deserialize()
        .context("Invalid dashboard configuration")
}
