use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

use crate::auth::decode_secret_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub jwt_secret: Vec<u8>,
    pub reminder_interval: Duration,
    pub log_format: LogFormat,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("FP_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid FP_LISTEN_ADDR")?;
        let db_path = env_or("FP_DB_PATH", "./db/app.db");
        let cors_allow = env_or("FP_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("FP_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .context("Invalid FP_REQUEST_TIMEOUT_MS")?;
        let jwt_secret = std::env::var("FP_JWT_SECRET")
            .context("FP_JWT_SECRET must be set")
            .and_then(|raw| decode_secret_key(&raw).context("Invalid FP_JWT_SECRET"))?;
        let reminder_secs: u64 = env_or("FP_REMINDER_INTERVAL_SECS", "3600")
            .parse()
            .context("Invalid FP_REMINDER_INTERVAL_SECS")?;
        if reminder_secs == 0 {
            anyhow::bail!("FP_REMINDER_INTERVAL_SECS must be greater than zero");
        }
        let log_format = match env_or("FP_LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "text" => LogFormat::Text,
            other => anyhow::bail!("Invalid FP_LOG_FORMAT '{}': expected text or json", other),
        };
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            reminder_interval: Duration::from_secs(reminder_secs),
            log_format,
        })
    }
}
