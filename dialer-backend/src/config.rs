use std::env;
use std::str::FromStr;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "DIALER_HOST";
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const DB_POOL_SIZE: &str = "DIALER_DB_POOL_SIZE";
    /// Comma-separated telecaller usernames created at startup if absent
    pub const SEED_TELECALLERS: &str = "DIALER_SEED_TELECALLERS";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 5000;
    pub const DATABASE_URL: &str = "./dialer_system.db";
    pub const DB_POOL_SIZE: u32 = 8;
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_pool_size: u32,
    pub seed_telecallers: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var(env_vars::HOST).unwrap_or_else(|_| defaults::HOST.to_string()),
            port: parse_or_default(env_vars::PORT, defaults::PORT),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            db_pool_size: parse_or_default(env_vars::DB_POOL_SIZE, defaults::DB_POOL_SIZE).max(1),
            seed_telecallers: env::var(env_vars::SEED_TELECALLERS)
                .map(|v| parse_username_list(&v))
                .unwrap_or_default(),
        }
    }
}

/// Read a numeric env var, falling back to the default (with a warning) when it
/// is set but unparseable.
fn parse_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{} must be a valid number (got {:?}), using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Split a comma-separated list, dropping blanks and duplicates while keeping order.
fn parse_username_list(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_username_list() {
        assert_eq!(
            parse_username_list(" alice, bob,,alice ,carol "),
            vec!["alice", "bob", "carol"]
        );
        assert!(parse_username_list("").is_empty());
        assert!(parse_username_list(" , ").is_empty());
    }
}
