use std::time::Duration;

use reqwest::Url;

use crate::ComposeError;

/// docker-compose-ui API root.
pub const ENV_BASE_URL: &str = "COMPOSE_UI_BASE_URL";
/// Client-side request timeout in seconds. Unset means no transport timeout.
pub const ENV_REQUEST_TIMEOUT: &str = "COMPOSE_UI_REQUEST_TIMEOUT";

pub const DEFAULT_BASE_URL: &str = "http://docker-compose-ui:5000/api/v1";

/// Connection settings for docker-compose-ui.
///
/// `request_timeout` bounds a single HTTP exchange. It is independent of the
/// provisioning deadline, which only bounds how long the caller waits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeUiConfig {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

impl Default for ComposeUiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ComposeUiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self, ComposeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ComposeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            cfg.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
            let invalid = |reason| ComposeError::InvalidConfig {
                key: ENV_REQUEST_TIMEOUT,
                value: raw.clone(),
                reason,
            };
            let secs: f64 = raw.trim().parse().map_err(|_| invalid("not a number"))?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(invalid("must be a positive number of seconds"));
            }
            cfg.request_timeout =
                Some(Duration::try_from_secs_f64(secs).map_err(|_| invalid("out of range"))?);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Rules:
    /// - `base_url` parses as an absolute url.
    /// - its scheme is http or https.
    pub fn validate(&self) -> Result<(), ComposeError> {
        let invalid = |reason| ComposeError::InvalidConfig {
            key: ENV_BASE_URL,
            value: self.base_url.clone(),
            reason,
        };

        let url = Url::parse(&self.base_url).map_err(|_| invalid("not a valid url"))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            _ => Err(invalid("expected an http:// or https:// url")),
        }
    }

    /// Full URL of the services endpoint.
    pub fn services_url(&self) -> String {
        format!("{}/services", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_compose_ui() {
        let cfg = ComposeUiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg, ComposeUiConfig::default());
        assert_eq!(
            cfg.services_url(),
            "http://docker-compose-ui:5000/api/v1/services"
        );
        assert!(cfg.request_timeout.is_none());
    }

    #[test]
    fn reads_url_and_timeout() {
        let cfg = ComposeUiConfig::from_lookup(|key| match key {
            ENV_BASE_URL => Some("https://compose.internal/api/v1/".into()),
            ENV_REQUEST_TIMEOUT => Some("2.5".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(cfg.services_url(), "https://compose.internal/api/v1/services");
        assert_eq!(cfg.request_timeout, Some(Duration::from_millis(2_500)));
    }

    #[test]
    fn rejects_bad_values() {
        let bad_url = ComposeUiConfig::from_lookup(|key| {
            (key == ENV_BASE_URL).then(|| "docker-compose-ui:5000".to_string())
        });
        assert!(matches!(
            bad_url,
            Err(ComposeError::InvalidConfig { key: ENV_BASE_URL, .. })
        ));

        for raw in ["http://", "http://[bad", "ftp://compose.internal/api/v1"] {
            let cfg = ComposeUiConfig::new(raw);
            assert!(
                matches!(
                    cfg.validate(),
                    Err(ComposeError::InvalidConfig { key: ENV_BASE_URL, .. })
                ),
                "{raw} should be rejected"
            );
        }

        for raw in ["0", "-3", "soon"] {
            let bad_timeout = ComposeUiConfig::from_lookup(|key| {
                (key == ENV_REQUEST_TIMEOUT).then(|| raw.to_string())
            });
            assert!(matches!(
                bad_timeout,
                Err(ComposeError::InvalidConfig { key: ENV_REQUEST_TIMEOUT, .. })
            ));
        }
    }
}
