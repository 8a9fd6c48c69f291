//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MINIK_BASE_URL` - Public URL for the admin panel
//! - `MINIK_FUNCTIONS_URL` - Base URL of the roles backend (`listAdmins`, `setAdminRole`)
//! - `MINIK_IDENTITY_API_KEY` - Identity provider web API key
//!
//! ## Optional
//! - `MINIK_HOST` - Bind address (default: 127.0.0.1)
//! - `MINIK_PORT` - Listen port (default: 3001)
//! - `MINIK_IDENTITY_URL` - Identity provider API (default: `https://identitytoolkit.googleapis.com/v1`)
//! - `MINIK_SECURE_TOKEN_URL` - Token refresh API (default: `https://securetoken.googleapis.com/v1`)
//! - `MINIK_BLOG_PANEL_URL` - Blog management panel loaded in the blog section (default: `/blog/manage`)
//! - `MINIK_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (TLS)
//! - `MINIK_TLS_CERT` - PEM-encoded certificate chain
//! - `MINIK_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";
const DEFAULT_BLOG_PANEL_URL: &str = "/blog/manage";

/// Fragments that mark a key copied from a sample `.env` (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &["your-", "changeme", "placeholder", "example", "xxx"];

/// Provider web API keys are 39 characters; anything much shorter is a typo.
const MIN_API_KEY_LEN: usize = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Identity provider (sign-in and token refresh)
    pub identity: IdentityConfig,
    /// Roles backend
    pub functions: FunctionsConfig,
    /// URL the blog section hands off to
    pub blog_panel_url: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Identity provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct IdentityConfig {
    /// Web API key sent as the `key` query parameter
    pub api_key: SecretString,
    /// Base URL of the account API (`accounts:signInWithPassword`)
    pub identity_url: String,
    /// Base URL of the token API (`token`)
    pub secure_token_url: String,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("api_key", &"[REDACTED]")
            .field("identity_url", &self.identity_url)
            .field("secure_token_url", &self.secure_token_url)
            .finish()
    }
}

/// Roles backend configuration.
#[derive(Debug, Clone)]
pub struct FunctionsConfig {
    /// Base URL the endpoint names are appended to
    pub base_url: String,
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_pems(
            get_optional_env("MINIK_TLS_CERT"),
            get_optional_env("MINIK_TLS_KEY"),
        )
    }

    /// Both PEMs or neither; one without the other is a misconfiguration.
    fn from_pems(
        cert_pem: Option<String>,
        key_pem: Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "MINIK_TLS_*".to_string(),
                "Both MINIK_TLS_CERT and MINIK_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// or if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("MINIK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MINIK_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("MINIK_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("MINIK_PORT".to_string(), e.to_string()))?;
        let base_url = get_url("MINIK_BASE_URL", None)?;

        let identity = IdentityConfig::from_env()?;
        let functions = FunctionsConfig::from_env()?;
        let blog_panel_url = get_env_or_default("MINIK_BLOG_PANEL_URL", DEFAULT_BLOG_PANEL_URL);
        let log_format = parse_log_format(&get_env_or_default("MINIK_LOG_FORMAT", "text"))?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let tls = TlsConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            identity,
            functions,
            blog_panel_url,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the panel is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl IdentityConfig {
    /// Load the identity provider settings.
    ///
    /// Shared with the CLI, which signs in against the same provider.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API key is missing or looks like a
    /// placeholder, or if a URL override does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_validated_secret("MINIK_IDENTITY_API_KEY")?,
            identity_url: get_url("MINIK_IDENTITY_URL", Some(DEFAULT_IDENTITY_URL))?,
            secure_token_url: get_url("MINIK_SECURE_TOKEN_URL", Some(DEFAULT_SECURE_TOKEN_URL))?,
        })
    }
}

impl FunctionsConfig {
    /// Load the roles backend settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `MINIK_FUNCTIONS_URL` is missing or not a URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_url("MINIK_FUNCTIONS_URL", None)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an absolute http(s) URL, without a trailing slash.
fn get_url(key: &str, default: Option<&str>) -> Result<String, ConfigError> {
    let value = match default {
        Some(default) => get_env_or_default(key, default),
        None => get_required_env(key)?,
    };
    validate_url(&value, key)
}

fn validate_url(value: &str, var_name: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(ConfigError::InvalidEnvVar(
            "MINIK_LOG_FORMAT".to_string(),
            format!("expected 'text' or 'json', got '{other}'"),
        )),
    }
}

/// Reject API keys that are obviously not real.
fn validate_api_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = key.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("looks like a placeholder (contains '{pattern}')"),
        ));
    }
    if key.len() < MIN_API_KEY_LEN || key.chars().any(char::is_whitespace) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "not a web API key; copy it from the provider console".to_string(),
        ));
    }
    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_api_key(&value, key)?;
    Ok(SecretString::from(value))
}
