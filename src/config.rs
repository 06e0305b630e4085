use std::{fmt, net::SocketAddr, path::PathBuf};

use anyhow::Context;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///./db.sqlite";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported DATABASE_URL `{0}`: only sqlite targets are supported")]
    UnsupportedDatabaseUrl(String),
}

/// Where the relational store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    File(PathBuf),
    Memory,
}

impl DatabaseTarget {
    /// Accepts both `sqlite:///relative.db` / `sqlite:////abs.db` and the
    /// shorter `sqlite:path` / `sqlite::memory:` spellings.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let rest = url
            .strip_prefix("sqlite:")
            .ok_or_else(|| ConfigError::UnsupportedDatabaseUrl(url.to_string()))?;

        let path = match rest.strip_prefix("//") {
            // empty authority: one more slash separates it from the path
            Some(after_authority) => after_authority
                .strip_prefix('/')
                .unwrap_or(after_authority),
            None => rest,
        };
        let path = path.split('?').next().unwrap_or_default();

        match path {
            "" | ":memory:" => Ok(Self::Memory),
            p => Ok(Self::File(PathBuf::from(p))),
        }
    }
}

impl fmt::Display for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "sqlite file {}", path.display()),
            Self::Memory => f.write_str("sqlite in-memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseTarget,
    pub host: String,
    pub port: u16,
    /// Prebuilt frontend bundle; served only when it contains `index.html`.
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());
        let database = DatabaseTarget::parse(&database_url)?;
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v
                .parse::<u16>()
                .with_context(|| format!("APP_PORT `{v}` is not a valid port"))?,
            Err(_) => 8000,
        };
        Ok(Self {
            database,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            static_dir: std::env::var("STATIC_DIR")
                .unwrap_or_else(|_| "static".into())
                .into(),
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_url_is_a_relative_file() {
        assert_eq!(
            DatabaseTarget::parse(DEFAULT_DATABASE_URL).unwrap(),
            DatabaseTarget::File(PathBuf::from("./db.sqlite"))
        );
    }

    #[test]
    fn four_slashes_keep_the_absolute_path() {
        assert_eq!(
            DatabaseTarget::parse("sqlite:////var/lib/portal/db.sqlite").unwrap(),
            DatabaseTarget::File(PathBuf::from("/var/lib/portal/db.sqlite"))
        );
    }

    #[test]
    fn sqlx_style_urls_are_accepted() {
        assert_eq!(
            DatabaseTarget::parse("sqlite:data.db").unwrap(),
            DatabaseTarget::File(PathBuf::from("data.db"))
        );
        assert_eq!(
            DatabaseTarget::parse("sqlite://data.db?mode=rwc").unwrap(),
            DatabaseTarget::File(PathBuf::from("data.db"))
        );
        assert_eq!(
            DatabaseTarget::parse("sqlite::memory:").unwrap(),
            DatabaseTarget::Memory
        );
    }

    #[test]
    fn empty_path_means_in_memory() {
        assert_eq!(DatabaseTarget::parse("sqlite://").unwrap(), DatabaseTarget::Memory);
        assert_eq!(
            DatabaseTarget::parse("sqlite:///:memory:").unwrap(),
            DatabaseTarget::Memory
        );
    }

    #[test]
    fn other_schemes_are_rejected() {
        let err = DatabaseTarget::parse("postgres://localhost/portal").unwrap_err();
        assert!(err.to_string().contains("postgres://localhost/portal"));
    }

    #[test]
    fn socket_addr_joins_host_and_port() {
        let config = AppConfig {
            database: DatabaseTarget::Memory,
            host: "127.0.0.1".into(),
            port: 8000,
            static_dir: "static".into(),
        };
        assert_eq!(config.socket_addr().unwrap().port(), 8000);
    }
}
