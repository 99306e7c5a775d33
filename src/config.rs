use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Answering endpoint (agentic-rag Edge Function) settings.
///
/// `base_url` and `service_key` may be left empty in the config file and
/// supplied via the `RAG_ENDPOINT_URL` / `RAG_SERVICE_KEY` environment
/// variables; after merging, both are mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub service_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Model hint forwarded to the endpoint when set
    #[serde(default)]
    pub model: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub backtrace: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Scoring and batch execution knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Minimum keyword-match score (0..=100) for a case to pass
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
    /// Cases invoked concurrently per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Pause between chunks, to stay under provider rate limits
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
    /// When set, a case also passes if the endpoint confidence reaches this
    /// floor. Off by default; the active value is recorded in every report.
    #[serde(default)]
    pub confidence_floor: Option<f64>,
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,
}

fn default_pass_threshold() -> f64 {
    crate::DEFAULT_PASS_THRESHOLD
}

fn default_chunk_size() -> usize {
    5
}

fn default_chunk_delay_ms() -> u64 {
    1000
}

fn default_reports_dir() -> String {
    "reports".to_string()
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
            chunk_size: default_chunk_size(),
            chunk_delay_ms: default_chunk_delay_ms(),
            confidence_floor: None,
            reports_dir: default_reports_dir(),
        }
    }
}

/// Retry behavior for rate-limited invocations. Other errors are never
/// retried; re-running the suite is the operator's call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Additional attempts after a rate-limit error
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Cooldown before the retry
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

fn default_max_attempts() -> u32 {
    1
}

fn default_cooldown_secs() -> u64 {
    60
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file, apply environment overrides and
    /// validate the result
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for real runs."
            );
            Self::from_file("config.example.toml")
        } else {
            // No file at all: environment variables may still carry everything
            let mut config = Self::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Environment variables take precedence over file values
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("RAG_ENDPOINT_URL") {
            self.endpoint.base_url = url;
        }
        if let Ok(key) = std::env::var("RAG_SERVICE_KEY") {
            self.endpoint.service_key = key;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
    }

    /// A missing endpoint or credential is a fatal startup error, never a
    /// per-call error
    pub fn validate(&self) -> crate::Result<()> {
        if self.endpoint.base_url.is_empty() {
            return Err(crate::PdragError::Config(
                "answering endpoint URL not set (config [endpoint].base_url or RAG_ENDPOINT_URL)"
                    .to_string(),
            ));
        }
        if self.endpoint.service_key.is_empty() {
            return Err(crate::PdragError::Config(
                "service key not set (config [endpoint].service_key or RAG_SERVICE_KEY)"
                    .to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.eval.pass_threshold) {
            return Err(crate::PdragError::Config(format!(
                "pass_threshold must be within 0..=100, got {}",
                self.eval.pass_threshold
            )));
        }
        if self.eval.chunk_size == 0 {
            return Err(crate::PdragError::Config(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get answering endpoint base URL
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint.base_url
    }

    /// Get answering endpoint service key
    pub fn service_key(&self) -> &str {
        &self.endpoint.service_key
    }

    /// Get per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_secs)
    }

    /// Get database URL
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Get max connections for database pool
    pub fn max_connections(&self) -> u32 {
        self.database.max_connections
    }

    /// Get min connections for database pool
    pub fn min_connections(&self) -> u32 {
        self.database.min_connections
    }

    /// Get connection timeout in seconds
    pub fn connection_timeout(&self) -> u64 {
        self.database.connection_timeout
    }

    /// Get pass threshold percentage
    pub fn pass_threshold(&self) -> f64 {
        self.eval.pass_threshold
    }

    /// Get batch chunk size
    pub fn chunk_size(&self) -> usize {
        self.eval.chunk_size
    }

    /// Get delay between chunks
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.eval.chunk_delay_ms)
    }

    /// Get reports output directory
    pub fn reports_dir(&self) -> &str {
        &self.eval.reports_dir
    }

    /// Get rate-limit cooldown
    pub fn retry_cooldown(&self) -> Duration {
        Duration::from_secs(self.retry.cooldown_secs)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            service_key: String::new(),
            timeout_secs: default_timeout_secs(),
            model: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            backtrace: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            eval: EvalConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!((config.pass_threshold() - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.chunk_size(), 5);
        assert_eq!(config.chunk_delay(), Duration::from_millis(1000));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.retry_cooldown(), Duration::from_secs(60));
        assert!(config.eval.confidence_floor.is_none());
    }

    #[test]
    fn test_validate_rejects_missing_endpoint() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = AppConfig::default();
        config.endpoint.base_url = "https://example.supabase.co".to_string();
        config.endpoint.service_key = "key".to_string();
        config.eval.pass_threshold = 140.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [endpoint]
            base_url = "https://example.supabase.co"
            service_key = "anon-key"

            [eval]
            pass_threshold = 70.0
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint_url(), "https://example.supabase.co");
        assert!((config.pass_threshold() - 70.0).abs() < f64::EPSILON);
        // Untouched sections keep their defaults
        assert_eq!(config.chunk_size(), 5);
        assert_eq!(config.logging.level, "info");
    }
}
