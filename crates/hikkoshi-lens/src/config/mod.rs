use crate::catalog::CoordinatePolicy;
use crate::ranking::{DEFAULT_GROUP_LIMIT, DEFAULT_STOP_RANGE};
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub ranking: RankingConfig,
    pub session: SessionConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let group_limit = match env::var("HIKKOSHI_GROUP_LIMIT") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidGroupLimit { value })?,
            Err(_) => DEFAULT_GROUP_LIMIT,
        };

        let coordinate_policy = match env::var("HIKKOSHI_COORDINATE_POLICY") {
            Ok(value) => value
                .parse::<CoordinatePolicy>()
                .map_err(|_| ConfigError::InvalidCoordinatePolicy { value })?,
            Err(_) => CoordinatePolicy::default(),
        };

        let stop_range = match env::var("HIKKOSHI_STOP_RANGE") {
            Ok(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|range| *range > 0)
                .ok_or(ConfigError::InvalidStopRange { value })?,
            Err(_) => DEFAULT_STOP_RANGE,
        };

        let debounce_ms = env::var("HIKKOSHI_DEBOUNCE_MS")
            .unwrap_or_else(|_| DEFAULT_DEBOUNCE_MS.to_string())
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidDebounce)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            ranking: RankingConfig {
                group_limit,
                coordinate_policy,
                stop_range,
            },
            session: SessionConfig { debounce_ms },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Knobs for scoring, grouping, and import.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    pub group_limit: usize,
    pub coordinate_policy: CoordinatePolicy,
    pub stop_range: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            group_limit: DEFAULT_GROUP_LIMIT,
            coordinate_policy: CoordinatePolicy::default(),
            stop_range: DEFAULT_STOP_RANGE,
        }
    }
}

/// Interactive weight-editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub debounce_ms: u64,
}

impl SessionConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidGroupLimit { value: String },
    InvalidCoordinatePolicy { value: String },
    InvalidStopRange { value: String },
    InvalidDebounce,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidGroupLimit { value } => write!(
                f,
                "HIKKOSHI_GROUP_LIMIT must be a positive integer, got '{value}'"
            ),
            ConfigError::InvalidCoordinatePolicy { value } => write!(
                f,
                "HIKKOSHI_COORDINATE_POLICY must be 'fallback' or 'reject', got '{value}'"
            ),
            ConfigError::InvalidStopRange { value } => write!(
                f,
                "HIKKOSHI_STOP_RANGE must be a positive integer, got '{value}'"
            ),
            ConfigError::InvalidDebounce => {
                write!(f, "HIKKOSHI_DEBOUNCE_MS must be a valid u64")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
