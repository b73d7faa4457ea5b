use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://apidragabrielagarcia.gestionconsultorios.com.ar/api";
pub const DEFAULT_TOKEN_FILE: &str = "./data/auth_token";
pub const DEFAULT_TIMEZONE: &str = "America/Argentina/Buenos_Aires";
pub const DEFAULT_PROFESSIONAL: &str = "Gabriela García";

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// File value first, then the process environment.
    pub fn get_or_env(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| env::var(key).ok())
    }
}

/// Typed view over [`AppConfig`] with defaults applied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub token_file: PathBuf,
    pub timezone: Tz,
    pub default_professional: String,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| config.get_or_env(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timezone_name = lookup("CLINIC_TIMEZONE").unwrap_or(DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(timezone_name.clone()))?;
        Ok(Self {
            api_base_url: lookup("API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL.to_string()),
            token_file: PathBuf::from(
                lookup("AUTH_TOKEN_FILE").unwrap_or(DEFAULT_TOKEN_FILE.to_string()),
            ),
            timezone,
            default_professional: lookup("DEFAULT_PROFESSIONAL")
                .unwrap_or(DEFAULT_PROFESSIONAL.to_string()),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            timezone: chrono_tz::America::Argentina::Buenos_Aires,
            default_professional: DEFAULT_PROFESSIONAL.to_string(),
        }
    }
}
