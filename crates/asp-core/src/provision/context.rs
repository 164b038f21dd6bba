use std::{fmt, time::Duration};

use asp_model::{DEFAULT_PROJECT, DEFAULT_SERVICE, Flag};
use tracing::{info, warn};

use crate::{provision::error::ConfigError, wait::PartialResolution};

/// Aggregator deadline in seconds.
pub const ENV_PROVISIONING_TIMEOUT: &str = "S2_PROVISIONING_TIMEOUT";
/// Function execution timeout in seconds.
pub const ENV_FUNCTION_TIMEOUT: &str = "AWS_LAMBDA_FUNCTION_TIMEOUT";
/// Whether an expired deadline returns partial results (`true`) or fails.
pub const ENV_RESOLVE_PARTIAL: &str = "S2_RESOLVE_PARTIAL";
pub const ENV_SERVICE: &str = "APP_SLAVE_SERVICE";
pub const ENV_PROJECT: &str = "APP_SLAVE_PROJECT";
pub const ENV_NODE_ENV: &str = "NODE_ENV";

/// Time kept in reserve between the provisioning deadline and the function timeout.
pub const SAFETY_MARGIN: Duration = Duration::from_secs(2);

/// Function timeout assumed when none is configured.
pub const DEFAULT_FUNCTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for one provisioning call, passed explicitly to [`crate::deploy_slaves`].
#[derive(Clone, PartialEq, Eq)]
pub struct ProvisionContext {
    provisioning_timeout: Duration,
    function_timeout: Duration,
    service: String,
    project: String,
    partial: PartialResolution,
    node_env: Option<String>,
}

impl ProvisionContext {
    /// Context with the given deadline and default service, project and policy.
    pub fn new(provisioning_timeout: Duration) -> Self {
        Self {
            provisioning_timeout,
            function_timeout: provisioning_timeout + SAFETY_MARGIN,
            service: DEFAULT_SERVICE.to_string(),
            project: DEFAULT_PROJECT.to_string(),
            partial: PartialResolution::default(),
            node_env: None,
        }
    }

    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    ///
    /// Without an explicit provisioning timeout, the deadline is the function
    /// timeout minus [`SAFETY_MARGIN`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let function_timeout = match lookup(ENV_FUNCTION_TIMEOUT) {
            Some(raw) => parse_seconds(ENV_FUNCTION_TIMEOUT, &raw)?,
            None => DEFAULT_FUNCTION_TIMEOUT,
        };
        let provisioning_timeout = match lookup(ENV_PROVISIONING_TIMEOUT) {
            Some(raw) => parse_seconds(ENV_PROVISIONING_TIMEOUT, &raw)?,
            None => function_timeout.saturating_sub(SAFETY_MARGIN),
        };
        let partial = match lookup(ENV_RESOLVE_PARTIAL) {
            Some(raw) => raw
                .parse::<Flag>()
                .map_err(|e| ConfigError::Invalid {
                    key: ENV_RESOLVE_PARTIAL,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?
                .into(),
            None => PartialResolution::default(),
        };

        Ok(Self {
            provisioning_timeout,
            function_timeout,
            service: non_empty(lookup(ENV_SERVICE)).unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
            project: non_empty(lookup(ENV_PROJECT)).unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
            partial,
            node_env: non_empty(lookup(ENV_NODE_ENV)),
        })
    }

    pub fn provisioning_timeout(&self) -> Duration {
        self.provisioning_timeout
    }

    pub fn function_timeout(&self) -> Duration {
        self.function_timeout
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn partial_resolution(&self) -> PartialResolution {
        self.partial
    }

    pub fn node_env(&self) -> Option<&str> {
        self.node_env.as_deref()
    }

    pub fn with_function_timeout(mut self, timeout: Duration) -> Self {
        self.function_timeout = timeout;
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn with_partial_resolution(mut self, partial: PartialResolution) -> Self {
        self.partial = partial;
        self
    }

    /// Returns `true` if the deadline leaves at least [`SAFETY_MARGIN`] before the function times out.
    pub fn leaves_safety_margin(&self) -> bool {
        self.provisioning_timeout + SAFETY_MARGIN <= self.function_timeout
    }

    /// Log the settings of interest for this invocation.
    pub fn log_environment(&self) {
        info!(
            node_env = self.node_env().unwrap_or("<unset>"),
            provisioning_timeout = ?self.provisioning_timeout,
            function_timeout = ?self.function_timeout,
            service = %self.service,
            project = %self.project,
            partial = ?self.partial,
            "provisioning environment",
        );
        if !self.leaves_safety_margin() {
            warn!(
                margin = ?SAFETY_MARGIN,
                "{ENV_PROVISIONING_TIMEOUT} should be at least the safety margin below {ENV_FUNCTION_TIMEOUT}",
            );
        }
    }
}

impl Default for ProvisionContext {
    fn default() -> Self {
        Self::new(DEFAULT_FUNCTION_TIMEOUT.saturating_sub(SAFETY_MARGIN))
            .with_function_timeout(DEFAULT_FUNCTION_TIMEOUT)
    }
}

impl fmt::Debug for ProvisionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionContext")
            .field("provisioning_timeout", &self.provisioning_timeout)
            .field("function_timeout", &self.function_timeout)
            .field("target", &format_args!("{}/{}", self.project, self.service))
            .field("partial", &self.partial)
            .finish()
    }
}

fn parse_seconds(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let secs: f64 = raw.trim().parse().map_err(|_| invalid("not a number"))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(invalid("must be a non-negative number of seconds"));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| invalid("out of range"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
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
    fn defaults_leave_safety_margin() {
        let ctx = ProvisionContext::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(ctx.function_timeout(), Duration::from_secs(30));
        assert_eq!(ctx.provisioning_timeout(), Duration::from_secs(28));
        assert_eq!(ctx.service(), "zap");
        assert_eq!(ctx.project(), "app-slave");
        assert_eq!(ctx.partial_resolution(), PartialResolution::Resolve);
        assert!(ctx.node_env().is_none());
        assert!(ctx.leaves_safety_margin());
        assert_eq!(ctx, ProvisionContext::default());
    }

    #[test]
    fn deadline_is_derived_from_function_timeout() {
        let ctx =
            ProvisionContext::from_lookup(lookup_from(&[(ENV_FUNCTION_TIMEOUT, "10")])).unwrap();
        assert_eq!(ctx.provisioning_timeout(), Duration::from_secs(8));

        let tiny =
            ProvisionContext::from_lookup(lookup_from(&[(ENV_FUNCTION_TIMEOUT, "1")])).unwrap();
        assert_eq!(tiny.provisioning_timeout(), Duration::ZERO);
    }

    #[test]
    fn explicit_deadline_wins_and_accepts_fractions() {
        let ctx = ProvisionContext::from_lookup(lookup_from(&[
            (ENV_FUNCTION_TIMEOUT, "10"),
            (ENV_PROVISIONING_TIMEOUT, "7.5"),
            (ENV_RESOLVE_PARTIAL, "false"),
            (ENV_SERVICE, "worker"),
            (ENV_PROJECT, "grid"),
            (ENV_NODE_ENV, "production"),
        ]))
        .unwrap();

        assert_eq!(ctx.provisioning_timeout(), Duration::from_millis(7_500));
        assert_eq!(ctx.partial_resolution(), PartialResolution::Reject);
        assert_eq!(ctx.service(), "worker");
        assert_eq!(ctx.project(), "grid");
        assert_eq!(ctx.node_env(), Some("production"));
    }

    #[test]
    fn deadline_too_close_to_function_timeout_is_flagged() {
        let ctx = ProvisionContext::from_lookup(lookup_from(&[
            (ENV_FUNCTION_TIMEOUT, "10"),
            (ENV_PROVISIONING_TIMEOUT, "9"),
        ]))
        .unwrap();
        assert!(!ctx.leaves_safety_margin());
    }

    #[test]
    fn rejects_malformed_numbers() {
        for raw in ["abc", "-1", "NaN", "inf"] {
            let err =
                ProvisionContext::from_lookup(lookup_from(&[(ENV_PROVISIONING_TIMEOUT, raw)]))
                    .unwrap_err();
            let ConfigError::Invalid { key, value, .. } = err;
            assert_eq!(key, ENV_PROVISIONING_TIMEOUT);
            assert_eq!(value, raw);
        }
    }

    #[test]
    fn rejects_malformed_flag() {
        let err = ProvisionContext::from_lookup(lookup_from(&[(ENV_RESOLVE_PARTIAL, "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_RESOLVE_PARTIAL, .. }));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let ctx = ProvisionContext::from_lookup(lookup_from(&[(ENV_SERVICE, "  ")])).unwrap();
        assert_eq!(ctx.service(), DEFAULT_SERVICE);
    }
}
