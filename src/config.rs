use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Dev origins allowed when `ALLOWED_ORIGINS` is not set.
pub const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:8000",
    "http://localhost:8080",
    "http://localhost:3000",
    "http://127.0.0.1:8000",
];

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub allowed_origins: Vec<String>,
    pub admin_key: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "3001"),
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379"),
            allowed_origins: load_origins(),
            admin_key: try_load("ADMIN_KEY", "change-me"),
        }
    }
}

fn load_origins() -> Vec<String> {
    match var("ALLOWED_ORIGINS") {
        Ok(raw) => raw
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect(),
        Err(_) => DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect(),
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
