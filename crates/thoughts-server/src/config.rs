use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

/// Placeholder secrets that must never guard a real deployment.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "dev-secret-change-me"];

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub auth_secret: Option<String>,
}

impl Config {
    /// Read `THOUGHTS_*` variables. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = var_or("THOUGHTS_HOST", "0.0.0.0");
        let port: u16 = var_or("THOUGHTS_PORT", "5000")
            .parse()
            .context("THOUGHTS_PORT must be a port number")?;
        let db_path = PathBuf::from(var_or("THOUGHTS_DB_PATH", "thoughts.db"));

        let auth_secret = std::env::var("THOUGHTS_AUTH_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());
        match auth_secret.as_deref() {
            Some(secret) if PLACEHOLDER_SECRETS.contains(&secret) => {
                anyhow::bail!("THOUGHTS_AUTH_SECRET is still a placeholder value")
            }
            Some(_) => info!("Bearer token auth enabled"),
            None => warn!("THOUGHTS_AUTH_SECRET not set, API is open to anyone"),
        }

        Ok(Self {
            host,
            port,
            db_path,
            auth_secret,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}
