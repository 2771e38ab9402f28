/*
 * Responsibility
 * - 環境変数の読み込み (PORT, DATABASE_URL / DB_*, JWT_SECRET, 画像保存先など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 2 * 60 * 60;
const DEFAULT_MAX_BODY_BYTES: usize = 3 * 1024 * 1024;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub db_max_connections: u32,

    pub jwt_secret: String,
    pub access_token_ttl: chrono::Duration,

    pub image_dir: PathBuf,
    pub image_base_url: String,

    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // database_url and jwt_secret carry credentials
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("db_max_connections", &self.db_max_connections)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("image_dir", &self.image_dir)
            .field("image_base_url", &self.image_base_url)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let database_url = match non_empty(&lookup, "DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let ttl_seconds: i64 = parse_or(
            &lookup,
            "ACCESS_TOKEN_TTL_SECONDS",
            DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
        )?;
        if ttl_seconds <= 0 {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }

        let image_dir = PathBuf::from(
            non_empty(&lookup, "IMAGE_DIR").unwrap_or_else(|| "./uploads".to_string()),
        );
        // image URLs are only accepted with a dotted host, so no bare `localhost`
        let image_base_url = non_empty(&lookup, "IMAGE_BASE_URL")
            .unwrap_or_else(|| format!("http://127.0.0.1:{port}/images"));

        let max_body_bytes = parse_or(&lookup, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;
        let timeout_seconds: u64 = parse_or(
            &lookup,
            "REQUEST_TIMEOUT_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
        )?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            db_max_connections,
            jwt_secret,
            access_token_ttl: chrono::Duration::seconds(ttl_seconds),
            image_dir,
            image_base_url,
            max_body_bytes,
            request_timeout: Duration::from_secs(timeout_seconds),
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

// Unset means default; set but unparseable is a startup error.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn database_url_from_parts<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let user = non_empty(lookup, "DB_USERNAME").ok_or(ConfigError::Missing("DATABASE_URL"))?;
    let password = lookup("DB_PASSWORD").unwrap_or_default();
    let host = non_empty(lookup, "DB_HOST").unwrap_or_else(|| "localhost".to_string());
    let port = non_empty(lookup, "DB_PORT").unwrap_or_else(|| "5432".to_string());
    let name = non_empty(lookup, "DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;

    let mut url = url::Url::parse("postgres://localhost")
        .map_err(|_| ConfigError::Invalid("DATABASE_URL"))?;
    url.set_host(Some(&host))
        .map_err(|_| ConfigError::Invalid("DB_HOST"))?;
    let port: u16 = port.parse().map_err(|_| ConfigError::Invalid("DB_PORT"))?;
    url.set_port(Some(port))
        .map_err(|_| ConfigError::Invalid("DB_PORT"))?;
    url.set_username(&user)
        .map_err(|_| ConfigError::Invalid("DB_USERNAME"))?;
    if !password.is_empty() {
        url.set_password(Some(&password))
            .map_err(|_| ConfigError::Invalid("DB_PASSWORD"))?;
    }
    url.set_path(&name);
    if let Some(params) = non_empty(lookup, "DB_PARAMS") {
        url.set_query(Some(params.trim_start_matches('?')));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let cfg = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://u:p@db/ward"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.app_env, AppEnv::Development);
        assert_eq!(cfg.db_max_connections, 10);
        assert_eq!(cfg.access_token_ttl, chrono::Duration::hours(2));
        assert_eq!(cfg.image_dir, PathBuf::from("./uploads"));
        assert_eq!(cfg.image_base_url, "http://127.0.0.1:8080/images");
        assert_eq!(cfg.max_body_bytes, 3 * 1024 * 1024);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn empty_secret_fails_startup() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://u:p@db/ward"),
            ("JWT_SECRET", ""),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("JWT_SECRET"));

        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://u:p@db/ward")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn database_url_is_assembled_from_parts() {
        let cfg = Config::from_lookup(lookup(&[
            ("DB_USERNAME", "ward"),
            ("DB_PASSWORD", "pw"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_NAME", "hospital"),
            ("DB_PARAMS", "sslmode=disable"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(
            cfg.database_url,
            "postgres://ward:pw@db.internal:6543/hospital?sslmode=disable"
        );
    }

    #[test]
    fn missing_database_settings_are_reported() {
        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn unparseable_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://u:p@db/ward"),
            ("JWT_SECRET", "s3cret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));
    }

    #[test]
    fn production_env_is_recognised() {
        assert_eq!(AppEnv::parse(Some("PROD".into())), AppEnv::Production);
        assert_eq!(AppEnv::parse(None), AppEnv::Development);
    }
}
