use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Default lifetime of an issued session token.
const DEFAULT_TOKEN_TTL: &str = "7d";

/// Longest accepted session token lifetime (ten years).
const MAX_TOKEN_TTL: Duration = Duration::from_secs(10 * 365 * 86400);

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The maximum number of pooled database connections.
    pub db_pool_max_size: usize,
    /// The HMAC secret used to sign session tokens.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// How long an issued session token stays valid.
    pub jwt_ttl: Duration,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The browser origin allowed by CORS.
    pub cors_origin: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .context("JWT_SECRET must be set (generate with: openssl rand -hex 32)")?;

        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        if jwt_secret.len() < 32 {
            tracing::warn!("⚠️ JWT_SECRET is shorter than 32 bytes");
        }

        let jwt_ttl = parse_token_ttl(
            &env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| DEFAULT_TOKEN_TTL.to_string()),
        )?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            db_pool_max_size: env::var("DB_POOL_MAX_SIZE")
                .unwrap_or_else(|_| "16".to_string())
                .parse()
                .context("Invalid DB_POOL_MAX_SIZE")?,
            jwt_secret: Zeroizing::new(jwt_secret.into_bytes()),
            jwt_ttl,
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:5001".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}

/// Parses a token lifetime such as `7d`, `12h` or `90m`.
fn parse_token_ttl(raw: &str) -> Result<Duration> {
    let ttl = humantime::parse_duration(raw.trim())
        .with_context(|| format!("Invalid JWT_EXPIRES_IN: {raw}"))?;

    if ttl.is_zero() {
        anyhow::bail!("JWT_EXPIRES_IN must be greater than zero");
    }
    if ttl > MAX_TOKEN_TTL {
        anyhow::bail!("JWT_EXPIRES_IN must not exceed {}", humantime::format_duration(MAX_TOKEN_TTL));
    }

    Ok(ttl)
}
