use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: PathBuf,
    pub token_secret: String,
    pub token_ttl_minutes: i64,
    pub cors_allowed_origins: Vec<String>,
    pub photo_dir: PathBuf,
    /// Ceiling applied after the upload is fully buffered.
    pub max_upload_bytes: usize,
    pub payment_api_key: Option<String>,
    pub payment_base_url: String,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_path: PathBuf::from("artifacts/lanyard.sqlite"),
            token_secret: "change-me-in-production".to_string(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            cors_allowed_origins: Vec::new(),
            photo_dir: PathBuf::from("artifacts/photos"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            payment_api_key: None,
            payment_base_url: "https://api.stripe.com".to_string(),
            log_json: true,
        }
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("LANYARD_BIND").unwrap_or(defaults.bind_addr),
            database_path: env::var("LANYARD_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            token_secret: env::var("LANYARD_TOKEN_SECRET").unwrap_or(defaults.token_secret),
            token_ttl_minutes: env_i64("LANYARD_TOKEN_TTL_MINUTES", defaults.token_ttl_minutes),
            cors_allowed_origins: env_list("LANYARD_CORS_ORIGINS"),
            photo_dir: env::var("LANYARD_PHOTO_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.photo_dir),
            max_upload_bytes: env_usize("LANYARD_MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            payment_api_key: env::var("LANYARD_PAYMENT_API_KEY").ok().filter(|v| !v.is_empty()),
            payment_base_url: env::var("LANYARD_PAYMENT_BASE_URL")
                .unwrap_or(defaults.payment_base_url),
            log_json: env_bool("LANYARD_LOG_JSON", defaults.log_json),
        }
    }
}

pub fn validate_startup_config(config: &Config) -> Result<(), String> {
    if config.token_secret.trim().is_empty() {
        return Err("token secret must not be empty".to_string());
    }
    if config.token_ttl_minutes <= 0 {
        return Err("token ttl must be > 0".to_string());
    }
    if config.max_upload_bytes == 0 {
        return Err("max upload bytes must be > 0".to_string());
    }
    if config.bind_addr.trim().is_empty() {
        return Err("bind address must not be empty".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_config_validation_enforces_contracts() {
        validate_startup_config(&Config::default()).expect("defaults valid");

        let err = validate_startup_config(&Config {
            token_secret: "  ".to_string(),
            ..Config::default()
        })
        .expect_err("blank secret");
        assert!(err.contains("token secret"));

        let err = validate_startup_config(&Config {
            token_ttl_minutes: 0,
            ..Config::default()
        })
        .expect_err("zero ttl");
        assert!(err.contains("ttl"));

        let err = validate_startup_config(&Config {
            max_upload_bytes: 0,
            ..Config::default()
        })
        .expect_err("zero upload cap");
        assert!(err.contains("upload"));
    }
}
