use config::{Config, ConfigError};
use serde::Deserialize;

pub mod application;
pub mod domain;
pub mod infrastructure;

#[derive(Clone, Debug, Deserialize)]
pub struct MeiboConfig {
    pub store: Store,
    pub logger: Logger,
}

impl MeiboConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("meibo.toml"))
            .add_source(config::Environment::with_prefix("MEIBO").separator("_"))
            .build()?
            .try_deserialize::<MeiboConfig>()
    }
}

impl Default for MeiboConfig {
    fn default() -> Self {
        Self {
            store: Store {
                backend: Backend::Memory,
                url: None,
            },
            logger: Logger { level: Level::INFO },
        }
    }
}

/// 顧客ストアの接続先設定
#[derive(Clone, Debug, Deserialize)]
pub struct Store {
    pub backend: Backend,
    pub url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub enum Backend {
    Memory,
    Rest,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub level: Level,
}

#[derive(Clone, Debug, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}
