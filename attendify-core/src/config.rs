//! Configuration management

use crate::error::{AttendifyError, AttendifyResult};
use crate::logging::LoggingConfig;
use crate::types::{AttendifyConfig, ServerConfig, SessionConfig, SinkConfig};

use std::path::Path;

/// Minimum token entropy in bytes
pub const MIN_TOKEN_BYTES: usize = 8;

/// Longest accepted session lifetime, one day
pub const MAX_TTL_SECONDS: u64 = 24 * 60 * 60;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5050,
            static_dir: "frontend".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 120,
            default_subject: "General".to_string(),
            token_bytes: MIN_TOKEN_BYTES,
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: 5000,
        }
    }
}

impl Default for AttendifyConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            public_base_url: None,
            session: SessionConfig::default(),
            sink: SinkConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AttendifyConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AttendifyResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AttendifyError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: AttendifyConfig = toml::from_str(&content).map_err(|e| AttendifyError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> AttendifyResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| AttendifyError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| AttendifyError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> AttendifyResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Numeric variables that do not parse are an error rather than being
    /// skipped.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> AttendifyResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ATTENDIFY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(dir) = lookup("ATTENDIFY_STATIC_DIR") {
            self.server.static_dir = dir;
        }
        if let Some(url) = lookup("ATTENDANCE_SINK_URL") {
            self.sink.url = Some(url);
        }
        if let Some(ttl) = lookup("ATTENDIFY_TOKEN_TTL") {
            self.session.ttl_seconds = parse_env("ATTENDIFY_TOKEN_TTL", &ttl)?;
        }
        Ok(())
    }

    /// Fill in the public base URL from the process environment when unset
    pub fn resolve_base_url(&mut self) {
        self.resolve_base_url_from(|key| std::env::var(key).ok());
    }

    /// Fill in the public base URL from an arbitrary variable lookup when unset.
    ///
    /// Call after every port override so the local fallback uses the final port.
    pub fn resolve_base_url_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.public_base_url.is_none() {
            self.public_base_url = Some(resolve_public_base_url(&lookup, self.server.port));
        }
    }

    /// Public base URL without a trailing slash
    pub fn base_url(&self) -> String {
        let raw = self
            .public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", self.server.port));
        raw.trim_end_matches('/').to_string()
    }

    /// Validate configuration
    pub fn validate(&self) -> AttendifyResult<()> {
        if self.server.port == 0 {
            return Err(invalid("server.port must be greater than 0", "Set PORT or server.port"));
        }

        if self.session.ttl_seconds == 0 || self.session.ttl_seconds > MAX_TTL_SECONDS {
            return Err(invalid(
                &format!(
                    "session.ttl_seconds must be between 1 and {}",
                    MAX_TTL_SECONDS
                ),
                "Set session.ttl_seconds or ATTENDIFY_TOKEN_TTL to a value in range",
            ));
        }

        if self.session.token_bytes < MIN_TOKEN_BYTES {
            return Err(invalid(
                &format!("session.token_bytes must be at least {}", MIN_TOKEN_BYTES),
                "Raise session.token_bytes",
            ));
        }

        if self.session.default_subject.trim().is_empty() {
            return Err(invalid(
                "session.default_subject cannot be empty",
                "Set session.default_subject, e.g. \"General\"",
            ));
        }

        if self.sink.timeout_ms == 0 {
            return Err(invalid(
                "sink.timeout_ms must be greater than 0",
                "Set sink.timeout_ms to a positive value",
            ));
        }

        check_http_url("public_base_url", &self.base_url())?;
        if let Some(sink_url) = &self.sink.url {
            check_http_url("sink.url", sink_url)?;
        }

        Ok(())
    }
}

/// Resolve the externally reachable base URL.
///
/// Render deployments expose their hostname through `RENDER_EXTERNAL_HOSTNAME`;
/// otherwise `BACKEND_URL` wins, falling back to the local listener.
pub fn resolve_public_base_url<F>(lookup: &F, port: u16) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if lookup("RENDER").is_some() {
        if let Some(hostname) = lookup("RENDER_EXTERNAL_HOSTNAME") {
            return format!("https://{}", hostname);
        }
    }

    if let Some(url) = lookup("BACKEND_URL").filter(|u| !u.trim().is_empty()) {
        return url;
    }

    format!("http://127.0.0.1:{}", port)
}

fn parse_env<T>(key: &str, value: &str) -> AttendifyResult<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e: T::Err| AttendifyError::Config {
        message: format!("{} is not a valid number: {:?}", key, value),
        source: Some(Box::new(e)),
        context: crate::ErrorContext::new("config")
            .with_operation("apply_env")
            .with_metadata("variable", key)
            .with_suggestion("Fix or unset the environment variable"),
    })
}

fn invalid(message: &str, suggestion: &str) -> AttendifyError {
    AttendifyError::Config {
        message: message.to_string(),
        source: None,
        context: crate::ErrorContext::new("config")
            .with_operation("validate")
            .with_suggestion(suggestion),
    }
}

fn check_http_url(field: &str, value: &str) -> AttendifyResult<()> {
    let parsed = url::Url::parse(value).map_err(|e| AttendifyError::Config {
        message: format!("{} is not a valid URL: {}", field, e),
        source: Some(Box::new(e)),
        context: crate::ErrorContext::new("config")
            .with_operation("validate")
            .with_metadata("value", value),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(
            &format!("{} must use http or https, got {}", field, other),
            "Use an http:// or https:// URL",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AttendifyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.ttl_seconds, 120);
        assert_eq!(config.session.default_subject, "General");
        assert_eq!(config.server.port, 5050);
    }

    #[test]
    fn test_base_url_resolution_order() {
        let render = env(&[
            ("RENDER", "true"),
            ("RENDER_EXTERNAL_HOSTNAME", "attend.onrender.com"),
            ("BACKEND_URL", "http://ignored"),
        ]);
        assert_eq!(
            resolve_public_base_url(&render, 5050),
            "https://attend.onrender.com"
        );

        let backend = env(&[("BACKEND_URL", "https://abc.ngrok.app")]);
        assert_eq!(resolve_public_base_url(&backend, 5050), "https://abc.ngrok.app");

        let local = env(&[]);
        assert_eq!(resolve_public_base_url(&local, 8000), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_env_overrides() {
        let lookup = env(&[
            ("PORT", "9000"),
            ("ATTENDANCE_SINK_URL", "https://sink.example.com/exec"),
        ]);
        let mut config = AttendifyConfig::default();
        config.apply_env_from(&lookup).unwrap();
        config.resolve_base_url_from(&lookup);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.sink.url.as_deref(), Some("https://sink.example.com/exec"));
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_unparseable_env_numbers_are_errors() {
        for (key, value) in [("PORT", "50a0"), ("PORT", "70000"), ("ATTENDIFY_TOKEN_TTL", "2m")] {
            let mut config = AttendifyConfig::default();
            let result = config.apply_env_from(env(&[(key, value)]));
            assert!(
                matches!(result, Err(AttendifyError::Config { .. })),
                "{}={} should be rejected",
                key,
                value
            );
        }

        let mut config = AttendifyConfig::default();
        config
            .apply_env_from(env(&[("ATTENDIFY_TOKEN_TTL", " 300 ")]))
            .unwrap();
        assert_eq!(config.session.ttl_seconds, 300);
    }

    #[test]
    fn test_ttl_upper_bound() {
        let mut config = AttendifyConfig::default();
        config.session.ttl_seconds = MAX_TTL_SECONDS;
        assert!(config.validate().is_ok());

        for ttl in [MAX_TTL_SECONDS + 1, 10_000_000_000_000, u64::MAX] {
            config.session.ttl_seconds = ttl;
            assert!(
                matches!(config.validate(), Err(AttendifyError::Config { .. })),
                "ttl {} should be rejected",
                ttl
            );
        }
    }

    #[test]
    fn test_explicit_base_url_is_kept() {
        let mut config = AttendifyConfig {
            public_base_url: Some("https://school.example.org/".to_string()),
            ..Default::default()
        };
        config.resolve_base_url_from(env(&[("BACKEND_URL", "http://other")]));
        assert_eq!(config.base_url(), "https://school.example.org");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AttendifyConfig::default();
        config.session.token_bytes = 4;
        assert!(matches!(config.validate(), Err(AttendifyError::Config { .. })));

        let mut config = AttendifyConfig::default();
        config.session.ttl_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AttendifyConfig::default();
        config.sink.url = Some("ftp://example.com".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attendify.toml");

        let mut config = AttendifyConfig::default();
        config.session.default_subject = "Physics".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = AttendifyConfig::from_file(&path).unwrap();
        assert_eq!(loaded.session.default_subject, "Physics");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attendify.toml");
        std::fs::write(&path, "[session]\nttl_seconds = 60\n").unwrap();

        let loaded = AttendifyConfig::from_file(&path).unwrap();
        assert_eq!(loaded.session.ttl_seconds, 60);
        assert_eq!(loaded.session.default_subject, "General");
        assert_eq!(loaded.sink.timeout_ms, 5000);
    }
}
