use anyhow::Result;
use bigdecimal::BigDecimal;
use std::env;
use std::str::FromStr;

use crate::services::aggregation::default_pool_rate;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    pub pool_rate: BigDecimal,
    pub summary_cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://postgres@localhost:5432/apevault".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "your-super-secret-jwt-key-change-this-in-production-12345".to_string()
            }),
            jwt_expiration_days: env::var("JWT_EXPIRATION_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            pool_rate: parse_pool_rate(env::var("POOL_RATE").ok().as_deref())?,
            summary_cache_ttl_secs: env::var("SUMMARY_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
        })
    }

    /// Fixed configuration for tests; never reads the environment.
    pub fn test_config() -> Self {
        Config {
            database_url: "postgres://postgres@localhost:5432/apevault_test".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            pool_rate: default_pool_rate(),
            summary_cache_ttl_secs: 60,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The pool rate must be a fraction in `[0, 1]`; anything else is a
/// misconfiguration rather than something to silently clamp.
fn parse_pool_rate(raw: Option<&str>) -> Result<BigDecimal> {
    let Some(raw) = raw else {
        return Ok(default_pool_rate());
    };

    let rate = BigDecimal::from_str(raw.trim())
        .map_err(|e| anyhow::anyhow!("POOL_RATE is not a decimal ({}): {}", raw, e))?;

    if rate < BigDecimal::from(0) || rate > BigDecimal::from(1) {
        anyhow::bail!("POOL_RATE must be between 0 and 1, got {}", rate);
    }

    Ok(rate)
}
