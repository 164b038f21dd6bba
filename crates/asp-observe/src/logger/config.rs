use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use asp_model::Flag;

use crate::logger::{
    error::{LoggerError, LoggerResult},
    object::{LoggerFormat, LoggerLevel, LoggerTimeZone},
};

/// Environment variable selecting the output format (`text` or `json`).
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
/// Environment variable holding an `EnvFilter` expression.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
/// Environment variable selecting the timestamp timezone (`utc` or `local`).
pub const ENV_LOG_TZ: &str = "LOG_TZ";
/// Environment variable toggling ANSI colors (`true` / `false`).
pub const ENV_LOG_COLOR: &str = "LOG_COLOR";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Log level filter expression (e.g., "info", "asp_core=debug,info").
    pub level: LoggerLevel,
    /// Timezone for timestamps.
    pub tz: LoggerTimeZone,
    /// Whether to include module/target names in log output.
    pub with_targets: bool,
    /// Whether to use colored output.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Build a config from the process environment.
    ///
    /// Unset variables keep their defaults; set but malformed ones are rejected.
    pub fn from_env() -> LoggerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> LoggerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            cfg.format = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            cfg.level = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_LOG_TZ) {
            cfg.tz = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_LOG_COLOR) {
            let flag: Flag = raw.parse().map_err(|_| LoggerError::InvalidSetting {
                key: ENV_LOG_COLOR,
                value: raw.clone(),
            })?;
            cfg.use_color = flag.is_enabled();
        }
        Ok(cfg)
    }

    /// Determines whether colored output should be used.
    ///
    /// Color is enabled only if `use_color` is set and stderr, where log lines
    /// are written, is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_values() {
        let config = LoggerConfig::default();

        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.tz, LoggerTimeZone::Utc);
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
        assert!(config.use_color);
    }

    #[test]
    fn serde_uses_defaults_for_missing_fields() {
        let config: LoggerConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.level.as_str(), "info");
        assert_eq!(config.format, LoggerFormat::default());
        assert_eq!(config.tz, LoggerTimeZone::default());
        assert!(config.with_targets);
    }

    #[test]
    fn partial_deserialization() {
        let json = r#"{"format": "json", "level": "debug"}"#;
        let config: LoggerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "debug");
        assert!(config.use_color);
    }

    #[test]
    fn lookup_without_variables_gives_defaults() {
        let config = LoggerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.level.as_str(), "info");
    }

    #[test]
    fn lookup_overrides_each_field() {
        let config = LoggerConfig::from_lookup(lookup_from(&[
            (ENV_LOG_FORMAT, "JSON"),
            (ENV_LOG_LEVEL, "asp_core=trace,warn"),
            (ENV_LOG_TZ, "local"),
            (ENV_LOG_COLOR, "off"),
        ]))
        .unwrap();

        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "asp_core=trace,warn");
        assert_eq!(config.tz, LoggerTimeZone::Local);
        assert!(!config.use_color);
    }

    #[test]
    fn lookup_rejects_bad_values() {
        let bad_format = LoggerConfig::from_lookup(lookup_from(&[(ENV_LOG_FORMAT, "xml")]));
        assert!(matches!(bad_format, Err(LoggerError::InvalidFormat(_))));

        let bad_color = LoggerConfig::from_lookup(lookup_from(&[(ENV_LOG_COLOR, "maybe")]));
        assert!(matches!(
            bad_color,
            Err(LoggerError::InvalidSetting { key: ENV_LOG_COLOR, .. })
        ));
    }
}
