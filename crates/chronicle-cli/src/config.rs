use chronicle_core::config::EngineConfig;
use chronicle_core::recurrence::DEFAULT_EXPANSION_LIMIT;
use chronicle_core::timezone::parse_timezone;
use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// The calendar owner all commands act on
    #[serde(default)]
    pub user_id: Uuid,
    /// Zone used when the user has none stored (IANA format)
    #[serde(default = "detect_system_timezone")]
    pub default_timezone: String,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_expansion_limit")]
    pub expansion_limit: u16,
}

fn default_database_path() -> String {
    "chronicle.db".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_expansion_limit() -> u16 {
    DEFAULT_EXPANSION_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            user_id: Uuid::nil(),
            default_timezone: detect_system_timezone(),
            log_level: default_log_level(),
            expansion_limit: default_expansion_limit(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file("chronicle.toml"))
            .merge(Env::prefixed("CHRONICLE_"))
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            expansion_limit: self.expansion_limit,
        }
    }

    /// The configured fallback zone, or UTC when it is not a valid IANA name
    pub fn fallback_timezone(&self) -> Tz {
        match parse_timezone(&self.default_timezone) {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!(timezone = %self.default_timezone, "Unknown default timezone, using UTC");
                Tz::UTC
            }
        }
    }
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.is_empty() && parse_timezone(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(tz) = iana_time_zone::get_timezone() {
        if parse_timezone(&tz).is_ok() {
            return tz;
        }
    }

    "UTC".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let config = Config::new()?;
            assert_eq!(config.database_path, "chronicle.db");
            assert_eq!(config.user_id, Uuid::nil());
            assert_eq!(config.log_level, "warn");
            assert_eq!(config.engine(), EngineConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "chronicle.toml",
                r#"
                database_path = "from-file.db"
                default_timezone = "Europe/Paris"
                expansion_limit = 50
                "#,
            )?;
            jail.set_env("CHRONICLE_DATABASE_PATH", "from-env.db");

            let config = Config::new()?;
            assert_eq!(config.database_path, "from-env.db");
            assert_eq!(config.fallback_timezone(), chrono_tz::Europe::Paris);
            assert_eq!(config.engine().expansion_limit, 50);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_default_timezone_falls_back_to_utc() {
        let config = Config {
            default_timezone: "Mars/Olympus".to_string(),
            ..Config::default()
        };
        assert_eq!(config.fallback_timezone(), Tz::UTC);
    }
}
