use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

/// Super-admin account ensured at startup.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Raw `EC_JWT_SECRET`; a random key is generated per process when unset.
    pub jwt_secret: Option<String>,
    pub token_ttl: Duration,
    pub admin: Option<AdminBootstrap>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses a positive integer setting; malformed or zero values fail startup.
fn parse_positive(key: &str, raw: &str) -> anyhow::Result<u64> {
    let value: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid {key} '{raw}'"))?;
    anyhow::ensure!(value > 0, "{key} must be greater than 0");
    Ok(value)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("EC_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid EC_LISTEN_ADDR")?;
        let db_path = env_or("EC_DB_PATH", "./db/app.db");
        let cors_allow = env_or("EC_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms = parse_positive(
            "EC_REQUEST_TIMEOUT_MS",
            &env_or("EC_REQUEST_TIMEOUT_MS", "30000"),
        )?;
        let ttl_secs = parse_positive("EC_TOKEN_TTL_SECS", &env_or("EC_TOKEN_TTL_SECS", "3600"))?;
        let jwt_secret = std::env::var("EC_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let admin = match (
            std::env::var("EC_ADMIN_EMAIL").ok(),
            std::env::var("EC_ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) if !email.trim().is_empty() => Some(AdminBootstrap {
                name: env_or("EC_ADMIN_NAME", "Administrator"),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            token_ttl: Duration::from_secs(ttl_secs),
            admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_settings_parse() {
        assert_eq!(parse_positive("EC_TOKEN_TTL_SECS", "3600").unwrap(), 3600);
        assert_eq!(parse_positive("EC_REQUEST_TIMEOUT_MS", " 250 ").unwrap(), 250);
    }

    #[test]
    fn test_malformed_settings_fail_instead_of_defaulting() {
        let err = parse_positive("EC_REQUEST_TIMEOUT_MS", "30s").unwrap_err();
        assert!(err.to_string().contains("EC_REQUEST_TIMEOUT_MS"));
        assert!(parse_positive("EC_TOKEN_TTL_SECS", "-1").is_err());
        assert!(parse_positive("EC_TOKEN_TTL_SECS", "0").is_err());
    }
}
