use serde::Deserialize;
use std::{env, fmt, fs, path::PathBuf};

use crate::domain::pix::MAX_VALUE_LEN;
use crate::interface_adapters::state::ServiceSettings;

// Runtime configuration: optional TOML file, then environment overrides.

const DEFAULT_CONFIG_FILE: &str = "wedding.toml";

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub port: u16,
    pub database_url: Option<String>,
    pub storage: StorageBackend,
    pub environment: Environment,
    pub guest_link_base_url: String,
    pub pix_merchant_city: String,
    pub session_ttl_seconds: u64,
    pub db_max_connections: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let service = ServiceSettings::default();
        Self {
            port: 3000,
            database_url: None,
            storage: StorageBackend::default(),
            environment: Environment::default(),
            guest_link_base_url: service.guest_link_base_url,
            pix_merchant_city: service.pix_merchant_city,
            session_ttl_seconds: service.session_ttl_seconds,
            db_max_connections: 5,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    InvalidVar { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            ConfigError::InvalidVar { name, value } => {
                write!(f, "invalid value for {name}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = match config_path() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_overrides(|name| env::var(name).ok())?;
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Applies environment overrides on top of file values. `lookup` returns
    /// the raw variable, `None` when unset.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = parsed(&lookup, "WEDDING_SERVER_PORT")? {
            self.port = port;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(raw) = lookup("WEDDING_STORAGE") {
            self.storage = match raw.trim().to_ascii_lowercase().as_str() {
                "postgres" => StorageBackend::Postgres,
                "memory" => StorageBackend::Memory,
                _ => return Err(invalid("WEDDING_STORAGE", raw)),
            };
        }
        if let Some(raw) = lookup("WEDDING_ENVIRONMENT") {
            self.environment = match raw.trim().to_ascii_lowercase().as_str() {
                "development" => Environment::Development,
                "production" => Environment::Production,
                _ => return Err(invalid("WEDDING_ENVIRONMENT", raw)),
            };
        }
        if let Some(url) = lookup("GUEST_LINK_BASE_URL") {
            self.guest_link_base_url = url;
        }
        if let Some(city) = lookup("PIX_MERCHANT_CITY") {
            self.pix_merchant_city = city;
        }
        if let Some(ttl) = parsed(&lookup, "SESSION_TTL_SECONDS")? {
            self.session_ttl_seconds = ttl;
        }
        if let Some(max) = parsed(&lookup, "DB_MAX_CONNECTIONS")? {
            self.db_max_connections = max;
        }

        // Merchant city is PIX tag 60.
        let city = self.pix_merchant_city.trim();
        if city.is_empty() || city.len() > MAX_VALUE_LEN {
            return Err(invalid("PIX_MERCHANT_CITY", self.pix_merchant_city.clone()));
        }
        Ok(())
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            production: self.environment == Environment::Production,
            guest_link_base_url: self.guest_link_base_url.clone(),
            pix_merchant_city: self.pix_merchant_city.clone(),
            session_ttl_seconds: self.session_ttl_seconds,
        }
    }
}

// WEDDING_CONFIG wins; otherwise ./wedding.toml when present.
fn config_path() -> Option<PathBuf> {
    match env::var("WEDDING_CONFIG") {
        Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
        _ => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

fn parsed<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(name, raw)),
        None => Ok(None),
    }
}

fn invalid(name: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidVar { name, value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn when_nothing_is_configured_then_defaults_apply() {
        let mut settings = Settings::default();
        settings.apply_overrides(lookup_from(&[])).unwrap();

        assert_eq!(settings.port, 3000);
        assert_eq!(settings.storage, StorageBackend::Postgres);
        assert_eq!(settings.pix_merchant_city, "ANANINDEUA");
        assert_eq!(settings.session_ttl_seconds, 691_200);
        assert!(!settings.service_settings().production);
    }

    #[test]
    fn when_toml_sets_some_fields_then_others_keep_defaults() {
        let settings = Settings::from_toml(
            r#"
            port = 8080
            storage = "memory"
            environment = "production"
            "#,
        )
        .unwrap();

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.storage, StorageBackend::Memory);
        assert!(settings.service_settings().production);
        assert_eq!(settings.db_max_connections, 5);
    }

    #[test]
    fn when_toml_has_unknown_key_then_parse_fails() {
        assert!(Settings::from_toml("prot = 8080").is_err());
    }

    #[test]
    fn when_env_overrides_are_set_then_they_win_over_file_values() {
        let mut settings = Settings::from_toml("port = 8080\npix_merchant_city = \"BELEM\"").unwrap();
        settings
            .apply_overrides(lookup_from(&[
                ("WEDDING_SERVER_PORT", "9090"),
                ("WEDDING_STORAGE", "Memory"),
                ("DATABASE_URL", "postgres://localhost/wedding"),
                ("SESSION_TTL_SECONDS", "3600"),
            ]))
            .unwrap();

        assert_eq!(settings.port, 9090);
        assert_eq!(settings.storage, StorageBackend::Memory);
        assert_eq!(settings.pix_merchant_city, "BELEM");
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/wedding"));
        assert_eq!(settings.session_ttl_seconds, 3600);
    }

    #[test]
    fn when_env_value_is_unparsable_then_returns_invalid_var() {
        let mut settings = Settings::default();
        let err = settings
            .apply_overrides(lookup_from(&[("DB_MAX_CONNECTIONS", "many")]))
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidVar { name: "DB_MAX_CONNECTIONS", .. }
        ));
        assert_eq!(err.to_string(), "invalid value for DB_MAX_CONNECTIONS: \"many\"");
    }

    #[test]
    fn when_storage_backend_is_unknown_then_returns_invalid_var() {
        let mut settings = Settings::default();
        let err = settings
            .apply_overrides(lookup_from(&[("WEDDING_STORAGE", "redis")]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidVar { name: "WEDDING_STORAGE", .. }));
    }

    #[test]
    fn when_merchant_city_exceeds_pix_field_limit_then_returns_invalid_var() {
        let oversized = "SÃO ".repeat(20);
        let mut settings = Settings::default();
        let err = settings
            .apply_overrides(lookup_from(&[("PIX_MERCHANT_CITY", oversized.as_str())]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidVar { name: "PIX_MERCHANT_CITY", .. }));
    }

    #[test]
    fn when_file_sets_blank_merchant_city_then_overrides_reject_it() {
        let mut settings = Settings::from_toml("pix_merchant_city = \"  \"").unwrap();

        let err = settings.apply_overrides(lookup_from(&[])).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidVar { name: "PIX_MERCHANT_CITY", .. }));
    }
}
