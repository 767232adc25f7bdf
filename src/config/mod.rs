//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SENTIMENT_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use crate::constants::{DEFAULT_MODEL_ENDPOINT, DEFAULT_MODEL_PATH};
use crate::inference::GatewaySettings;
use crate::scoring::{DEFAULT_THRESHOLD, validate_threshold};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SENTIMENT_*` overrides on top of defaults,
/// then [`Config::validate`] before building anything from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the pre-built classifier.
    pub model_path: PathBuf,

    /// Classification head the model is invoked through. Default: `classifier`.
    pub model_endpoint: String,

    /// Decision boundary between negative and positive. Default: `0.5`.
    pub confidence_threshold: f64,

    /// Log level used when `RUST_LOG` is not set. Default: `info`.
    pub log_level: String,

    /// Origins allowed by CORS. `*` allows any origin. Default: `["*"]`.
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            confidence_threshold: DEFAULT_THRESHOLD,
            log_level: "info".to_string(),
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SENTIMENT_PORT";
    const ENV_BIND_ADDR: &'static str = "SENTIMENT_BIND_ADDR";
    const ENV_MODEL_PATH: &'static str = "SENTIMENT_MODEL_PATH";
    const ENV_MODEL_ENDPOINT: &'static str = "SENTIMENT_MODEL_ENDPOINT";
    const ENV_CONFIDENCE_THRESHOLD: &'static str = "SENTIMENT_CONFIDENCE_THRESHOLD";
    const ENV_LOG_LEVEL: &'static str = "SENTIMENT_LOG_LEVEL";
    const ENV_ALLOWED_ORIGINS: &'static str = "SENTIMENT_ALLOWED_ORIGINS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_path = Self::parse_path_from_env(Self::ENV_MODEL_PATH, defaults.model_path);
        let model_endpoint =
            Self::parse_string_from_env(Self::ENV_MODEL_ENDPOINT, defaults.model_endpoint);
        let confidence_threshold = Self::parse_threshold_from_env(defaults.confidence_threshold)?;
        let log_level = Self::parse_string_from_env(Self::ENV_LOG_LEVEL, defaults.log_level);
        let allowed_origins = Self::parse_list_from_env(
            Self::ENV_ALLOWED_ORIGINS,
            defaults.allowed_origins,
        );

        Ok(Self {
            port,
            bind_addr,
            model_path,
            model_endpoint,
            confidence_threshold,
            log_level,
            allowed_origins,
        })
    }

    /// Checks the invariants the rest of the service relies on.
    ///
    /// The model path is not checked here; a missing model surfaces when the
    /// inference gateway loads.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_threshold(self.confidence_threshold)?;

        if self.model_endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: "model endpoint",
            });
        }

        if self.allowed_origins.is_empty() {
            return Err(ConfigError::EmptyValue {
                name: "allowed origins",
            });
        }

        self.log_directive().map(|_| ())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Address a client on this host should use to reach the server.
    ///
    /// Unspecified binds (`0.0.0.0`, `::`) map to the loopback of the same family.
    pub fn local_addr(&self) -> SocketAddr {
        let ip = match self.bind_addr {
            IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            ip => ip,
        };
        SocketAddr::new(ip, self.port)
    }

    /// Maps the configured log level to a `tracing` filter directive.
    ///
    /// Accepts the usual level names in any case, plus `warning` and `critical`.
    pub fn log_directive(&self) -> Result<&'static str, ConfigError> {
        match self.log_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok("trace"),
            "debug" => Ok("debug"),
            "info" => Ok("info"),
            "warn" | "warning" => Ok("warn"),
            "error" | "critical" => Ok("error"),
            _ => Err(ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            }),
        }
    }

    /// Settings for the inference gateway.
    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings::new(self.model_path.clone())
            .with_endpoint(self.model_endpoint.clone())
            .with_threshold(self.confidence_threshold)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: f64) -> Result<f64, ConfigError> {
        match env::var(Self::ENV_CONFIDENCE_THRESHOLD) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::ThresholdParseError { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        match env::var(var_name) {
            Ok(value) => value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => default,
        }
    }
}
