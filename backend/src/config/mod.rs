//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Default SQLite database file, relative to the working directory
const DEFAULT_DATABASE_PATH: &str = "./data/catalog.db";

/// Cost factors bcrypt accepts
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// SQLite connection URL (`sqlite://path` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum pooled connections for file-backed databases
    pub database_max_connections: u32,

    /// JWT signing secret. When unset, a secret is generated once and
    /// persisted in the database.
    pub jwt_secret: Option<String>,

    /// Lifetime of issued bearer tokens in seconds
    pub token_lifetime_secs: i64,

    /// Bcrypt cost factor for password hashes
    pub bcrypt_cost: u32,

    /// Insert the starter catalog on startup
    pub seed_on_startup: bool,

    /// Console log output format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: None,
            port: 4000,
            database_url: database_url_from(None, None),
            database_max_connections: 5,
            jwt_secret: None,
            token_lifetime_secs: 24 * 60 * 60,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            seed_on_startup: true,
            log_format: LogFormat::Json,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = database_url_from(
            env::var("DATABASE_URL").ok(),
            env::var("DATABASE_PATH").ok(),
        );

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            host: env::var("HOST").ok(),

            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,

            jwt_secret,

            token_lifetime_secs: env::var("TOKEN_LIFETIME_SECS")
                .unwrap_or_else(|_| (24 * 60 * 60).to_string())
                .parse()
                .context("Invalid TOKEN_LIFETIME_SECS")?,

            bcrypt_cost: parse_bcrypt_cost(env::var("BCRYPT_COST").ok())?,

            seed_on_startup: env::var("SEED_DATABASE")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            log_format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(LogFormat::Json),
        })
    }
}

/// Assemble the store connection string. An explicit URL wins; a bare path is
/// wrapped into a `sqlite://` URL.
pub fn database_url_from(url: Option<String>, path: Option<String>) -> String {
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        return url;
    }
    let path = path
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
    format!("sqlite://{}", path)
}

/// Parse `BCRYPT_COST`, rejecting values bcrypt would refuse at hash time
fn parse_bcrypt_cost(value: Option<String>) -> Result<u32> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(bcrypt::DEFAULT_COST);
    };
    let cost: u32 = value.trim().parse().context("Invalid BCRYPT_COST")?;
    anyhow::ensure!(
        BCRYPT_COST_RANGE.contains(&cost),
        "Invalid BCRYPT_COST: {} is outside {}..={}",
        cost,
        BCRYPT_COST_RANGE.start(),
        BCRYPT_COST_RANGE.end()
    );
    Ok(cost)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
