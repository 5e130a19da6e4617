use std::{env, fmt::Display, str::FromStr};

use foodgram_core::pagination::DEFAULT_PAGE_SIZE;
use tracing::{info, warn};

/// Runtime settings read from the environment (and `.env`, when present).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub session_ttl_days: i64,
    pub default_page_size: i64,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Failed to read .env file: {e}");
            }
        }

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        Ok(Self {
            database_url,
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8000".to_string())?,
            session_ttl_days: try_load("SESSION_TTL_DAYS", 30)?,
            default_page_size: try_load("DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
        })
    }
}

fn try_load<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {key} value {raw:?}: {e}")),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/foodgram_test".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            session_ttl_days: 30,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_uses_default_when_unset() {
        let value: i64 = try_load("FOODGRAM_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
