//! Configuration module

use std::env;
use std::str::FromStr;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Maximum number of distinct (method, path) endpoints tracked
    pub max_endpoints: usize,

    /// Maximum number of distinct variant shapes retained per endpoint
    pub max_variants_per_endpoint: usize,

    /// JSON nesting depth beyond which shapes degrade to `unparsed`
    pub max_shape_depth: usize,

    /// Capacity of the recent request log
    pub max_records: usize,

    /// Log output format (text, json)
    pub log_format: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env_or("PORT", defaults.port),
            max_endpoints: env_or("MAX_ENDPOINTS", defaults.max_endpoints),
            max_variants_per_endpoint: env_or(
                "MAX_VARIANTS_PER_ENDPOINT",
                defaults.max_variants_per_endpoint,
            ),
            max_shape_depth: env_or("MAX_SHAPE_DEPTH", defaults.max_shape_depth),
            max_records: env_or("MAX_RECORDS", defaults.max_records),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 9000,
            max_endpoints: 1000,
            max_variants_per_endpoint: 10,
            max_shape_depth: 64,
            max_records: 1000,
            log_format: "text".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Read and parse an environment variable, falling back to `default`
/// when it is unset or unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
