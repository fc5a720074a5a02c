//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `DINESCOUT_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ACCEPTANCE_THRESHOLD, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_MINUTES,
    DEFAULT_ERROR_RATE_LIMIT, DEFAULT_ERROR_RATE_WINDOW, DEFAULT_FALLBACK_LANE_TTL_SECS,
    DEFAULT_FALLBACK_THRESHOLD, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_RESULTS,
    DEFAULT_PROVIDER_TIMEOUT_MS, DEFAULT_RETRY_BACKOFF_MS, DEFAULT_SWEEP_INTERVAL_SECS,
};
use crate::fallback::QualityTier;
use crate::parser::CuisineMode;
use crate::pipeline::PipelineConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `DINESCOUT_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Knowledge-search provider endpoint.
    pub provider_url: Option<String>,

    /// Serve canned demo records instead of calling a provider.
    pub mock_provider: bool,

    /// Cache entry time-to-live in minutes. Default: `30`.
    pub cache_ttl_minutes: u64,

    /// Max entries in the search cache. Default: `100`.
    pub cache_capacity: usize,

    /// Results per search when the request does not say. Default: `8`.
    pub max_results: usize,

    /// Provider call budget in milliseconds. Default: `30_000`.
    pub provider_timeout_ms: u64,

    /// Minimum validator score for a live result to be returned. Default: `60`.
    pub acceptance_threshold: u8,

    /// Minimum validator score for a fallback result to be returned. Default: `40`.
    pub fallback_threshold: u8,

    /// Provider attempts per request, first try included. Default: `3`.
    pub max_attempts: u32,

    /// Fixed delay between provider attempts. Default: `1000`.
    pub retry_backoff_ms: u64,

    /// Provider errors per origin within the window before retries stop. Default: `10`.
    pub error_rate_limit: usize,

    /// Error-rate limiter window in seconds. Default: `3600`.
    pub error_rate_window_secs: u64,

    /// Background sweep interval in seconds. Default: `300`.
    pub sweep_interval_secs: u64,

    /// Whether fallback synthesis may answer failed searches. Default: `true`.
    pub fallback_enabled: bool,

    /// TTL of the last-resort fallback lane in seconds. Default: `300`.
    pub fallback_lane_ttl_secs: u64,

    /// Size tier of synthesized fallback sets. Default: medium.
    pub fallback_tier: QualityTier,

    /// How unknown cuisines are treated. Default: lenient.
    pub cuisine_mode: CuisineMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            provider_url: None,
            mock_provider: false,
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_results: DEFAULT_MAX_RESULTS,
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            error_rate_limit: DEFAULT_ERROR_RATE_LIMIT,
            error_rate_window_secs: DEFAULT_ERROR_RATE_WINDOW.as_secs(),
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            fallback_enabled: true,
            fallback_lane_ttl_secs: DEFAULT_FALLBACK_LANE_TTL_SECS,
            fallback_tier: QualityTier::default(),
            cuisine_mode: CuisineMode::default(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "DINESCOUT_PORT";
    const ENV_BIND_ADDR: &'static str = "DINESCOUT_BIND_ADDR";
    const ENV_PROVIDER_URL: &'static str = "DINESCOUT_PROVIDER_URL";
    const ENV_MOCK_PROVIDER: &'static str = "DINESCOUT_MOCK_PROVIDER";
    const ENV_CACHE_TTL_MINUTES: &'static str = "DINESCOUT_CACHE_TTL_MINUTES";
    const ENV_CACHE_CAPACITY: &'static str = "DINESCOUT_CACHE_CAPACITY";
    const ENV_MAX_RESULTS: &'static str = "DINESCOUT_MAX_RESULTS";
    const ENV_PROVIDER_TIMEOUT_MS: &'static str = "DINESCOUT_PROVIDER_TIMEOUT_MS";
    const ENV_ACCEPTANCE_THRESHOLD: &'static str = "DINESCOUT_ACCEPTANCE_THRESHOLD";
    const ENV_FALLBACK_THRESHOLD: &'static str = "DINESCOUT_FALLBACK_THRESHOLD";
    const ENV_MAX_ATTEMPTS: &'static str = "DINESCOUT_MAX_ATTEMPTS";
    const ENV_RETRY_BACKOFF_MS: &'static str = "DINESCOUT_RETRY_BACKOFF_MS";
    const ENV_ERROR_RATE_LIMIT: &'static str = "DINESCOUT_ERROR_RATE_LIMIT";
    const ENV_ERROR_RATE_WINDOW_SECS: &'static str = "DINESCOUT_ERROR_RATE_WINDOW_SECS";
    const ENV_SWEEP_INTERVAL_SECS: &'static str = "DINESCOUT_SWEEP_INTERVAL_SECS";
    const ENV_FALLBACK_ENABLED: &'static str = "DINESCOUT_FALLBACK_ENABLED";
    const ENV_FALLBACK_LANE_TTL_SECS: &'static str = "DINESCOUT_FALLBACK_LANE_TTL_SECS";
    const ENV_FALLBACK_TIER: &'static str = "DINESCOUT_FALLBACK_TIER";
    const ENV_CUISINE_MODE: &'static str = "DINESCOUT_CUISINE_MODE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;

        Ok(Self {
            port,
            bind_addr,
            provider_url: Self::parse_optional_string_from_env(Self::ENV_PROVIDER_URL),
            mock_provider: env::var_os(Self::ENV_MOCK_PROVIDER).is_some_and(|v| !v.is_empty()),
            cache_ttl_minutes: Self::parse_from_env(
                Self::ENV_CACHE_TTL_MINUTES,
                defaults.cache_ttl_minutes,
            ),
            cache_capacity: Self::parse_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity),
            max_results: Self::parse_from_env(Self::ENV_MAX_RESULTS, defaults.max_results),
            provider_timeout_ms: Self::parse_from_env(
                Self::ENV_PROVIDER_TIMEOUT_MS,
                defaults.provider_timeout_ms,
            ),
            acceptance_threshold: Self::parse_from_env(
                Self::ENV_ACCEPTANCE_THRESHOLD,
                defaults.acceptance_threshold,
            ),
            fallback_threshold: Self::parse_from_env(
                Self::ENV_FALLBACK_THRESHOLD,
                defaults.fallback_threshold,
            ),
            max_attempts: Self::parse_from_env(Self::ENV_MAX_ATTEMPTS, defaults.max_attempts),
            retry_backoff_ms: Self::parse_from_env(
                Self::ENV_RETRY_BACKOFF_MS,
                defaults.retry_backoff_ms,
            ),
            error_rate_limit: Self::parse_from_env(
                Self::ENV_ERROR_RATE_LIMIT,
                defaults.error_rate_limit,
            ),
            error_rate_window_secs: Self::parse_from_env(
                Self::ENV_ERROR_RATE_WINDOW_SECS,
                defaults.error_rate_window_secs,
            ),
            sweep_interval_secs: Self::parse_from_env(
                Self::ENV_SWEEP_INTERVAL_SECS,
                defaults.sweep_interval_secs,
            ),
            fallback_enabled: Self::parse_bool_from_env(
                Self::ENV_FALLBACK_ENABLED,
                defaults.fallback_enabled,
            ),
            fallback_lane_ttl_secs: Self::parse_from_env(
                Self::ENV_FALLBACK_LANE_TTL_SECS,
                defaults.fallback_lane_ttl_secs,
            ),
            fallback_tier: Self::parse_from_env(Self::ENV_FALLBACK_TIER, defaults.fallback_tier),
            cuisine_mode: Self::parse_from_env(Self::ENV_CUISINE_MODE, defaults.cuisine_mode),
        })
    }

    /// Validates basic invariants between settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        for (name, value) in [
            (Self::ENV_ACCEPTANCE_THRESHOLD, self.acceptance_threshold),
            (Self::ENV_FALLBACK_THRESHOLD, self.fallback_threshold),
        ] {
            if value > 100 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        if self.fallback_threshold > self.acceptance_threshold {
            return Err(ConfigError::FallbackThresholdTooHigh {
                fallback: self.fallback_threshold,
                acceptance: self.acceptance_threshold,
            });
        }

        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_ATTEMPTS,
                value: "0".to_string(),
            });
        }

        if !self.mock_provider && self.provider_url.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_PROVIDER_URL,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Cache entry time-to-live.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes * 60)
    }

    /// Provider call budget.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Background sweep interval.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Projects the settings the search pipeline consumes.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            cache_ttl: self.cache_ttl(),
            max_results: self.max_results,
            provider_timeout: self.provider_timeout(),
            acceptance_threshold: self.acceptance_threshold,
            fallback_threshold: self.fallback_threshold,
            max_attempts: self.max_attempts,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            error_rate_limit: self.error_rate_limit,
            error_rate_window: Duration::from_secs(self.error_rate_window_secs),
            fallback_enabled: self.fallback_enabled,
            fallback_lane_ttl: Duration::from_secs(self.fallback_lane_ttl_secs),
            fallback_tier: self.fallback_tier,
            cuisine_mode: self.cuisine_mode,
            fallback_seed: None,
        }
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

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        env::var(var_name)
            .map(|s| {
                let s = s.trim().to_lowercase();
                s != "false" && s != "0" && s != "no"
            })
            .unwrap_or(default)
    }

    fn parse_from_env<T: std::str::FromStr>(var_name: &str, default: T) -> T {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
