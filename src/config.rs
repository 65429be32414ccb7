use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::str::FromStr;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_file_size: usize,
    /// Total size of memoized CSV exports, in bytes.
    pub export_cache_max_bytes: u64,
    pub export_cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_file_size: default_max_file_size(),
            export_cache_max_bytes: 64 * 1024 * 1024,
            export_cache_ttl_secs: 15 * 60,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let defaults = Config::default();
        Ok(Config {
            bind_addr: env_or("BIND_ADDR", defaults.bind_addr)?,
            max_file_size: env_or("MAX_FILE_SIZE", defaults.max_file_size)?,
            export_cache_max_bytes: env_or("EXPORT_CACHE_MAX_BYTES", defaults.export_cache_max_bytes)?,
            export_cache_ttl_secs: env_or("EXPORT_CACHE_TTL_SECS", defaults.export_cache_ttl_secs)?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Failed to parse {}={:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

pub fn load_config() -> Result<Config> {
    let config = Config::from_env()?;
    tracing::info!(
        "Configuration loaded: bind_addr={}, max_file_size={}B, export cache {}B / {}s",
        config.bind_addr,
        config.max_file_size,
        config.export_cache_max_bytes,
        config.export_cache_ttl_secs
    );
    Ok(config)
}
