use std::path::PathBuf;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "pegasus-secret-key-change-me",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JSI_JWT_SECRET is unset or still a placeholder")]
    InsecureSecret,
    #[error("{name} is not a valid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub token_ttl: chrono::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JSI_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            return Err(ConfigError::InsecureSecret);
        }

        let db_path = lookup("JSI_DB_PATH").unwrap_or_else(|| "jsi.db".into()).into();
        let host = lookup("JSI_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "JSI_PORT", 3001u16)?;
        let ttl_hours = parse_or(&lookup, "JSI_TOKEN_TTL_HOURS", 24i64)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "JSI_TOKEN_TTL_HOURS",
                value: ttl_hours.to_string(),
            });
        }

        Ok(Self {
            jwt_secret,
            db_path,
            host,
            port,
            token_ttl: chrono::Duration::hours(ttl_hours),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}
