//! Application configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use remote::HttpRemoteConfig;
use rust_decimal::Decimal;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `INVENTORY_API_BASE_URL`: remote store (default: `"http://127.0.0.1:8000"`)
/// - `REMOTE_TIMEOUT_MS`: per-request timeout (default: `10000`)
/// - `REMOTE_MAX_RETRIES`: GET retries (default: `2`)
/// - `LOW_STOCK_THRESHOLD`: low-stock cut-off (default: `3`)
/// - `STATUS_POLL_INTERVAL_SECS`: status refresh period (default: `30`)
/// - `USERS_CACHE_TTL_SECS`: user list cache lifetime (default: `60`)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub remote_base_url: String,
    pub remote_timeout: Duration,
    pub remote_max_retries: u32,
    pub low_stock_threshold: Decimal,
    pub status_poll_interval: Duration,
    pub users_cache_ttl: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// Unparseable values are ignored in favour of the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT").unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            remote_base_url: std::env::var("INVENTORY_API_BASE_URL")
                .unwrap_or(defaults.remote_base_url),
            remote_timeout: parsed("REMOTE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.remote_timeout),
            remote_max_retries: parsed("REMOTE_MAX_RETRIES")
                .unwrap_or(defaults.remote_max_retries),
            low_stock_threshold: parsed::<Decimal>("LOW_STOCK_THRESHOLD")
                .filter(|t| !t.is_sign_negative())
                .unwrap_or(defaults.low_stock_threshold),
            status_poll_interval: parsed("STATUS_POLL_INTERVAL_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.status_poll_interval),
            users_cache_ttl: parsed("USERS_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.users_cache_ttl),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Transport settings for the remote store.
    pub fn remote(&self) -> HttpRemoteConfig {
        HttpRemoteConfig::new(self.remote_base_url.as_str())
            .timeout(self.remote_timeout)
            .max_retries(self.remote_max_retries)
    }
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        let remote = HttpRemoteConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            remote_base_url: remote.base_url,
            remote_timeout: remote.timeout,
            remote_max_retries: remote.max_retries,
            low_stock_threshold: projections::status::DEFAULT_LOW_STOCK_THRESHOLD,
            status_poll_interval: projections::status::DEFAULT_POLL_INTERVAL,
            users_cache_ttl: remote::cache::DEFAULT_USERS_TTL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 9] = [
        "HOST",
        "PORT",
        "RUST_LOG",
        "INVENTORY_API_BASE_URL",
        "REMOTE_TIMEOUT_MS",
        "REMOTE_MAX_RETRIES",
        "LOW_STOCK_THRESHOLD",
        "STATUS_POLL_INTERVAL_SECS",
        "USERS_CACHE_TTL_SECS",
    ];

    fn clear_env() {
        for key in KEYS {
            // SAFETY: tests touching the environment are serialized.
            unsafe { std::env::remove_var(key) };
        }
    }

    fn set(key: &str, value: &str) {
        // SAFETY: tests touching the environment are serialized.
        unsafe { std::env::set_var(key, value) };
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.remote_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.remote_timeout, Duration::from_secs(10));
        assert_eq!(config.remote_max_retries, 2);
        assert_eq!(config.low_stock_threshold, Decimal::from(3));
        assert_eq!(config.status_poll_interval, Duration::from_secs(30));
        assert_eq!(config.users_cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        set("PORT", "9090");
        set("INVENTORY_API_BASE_URL", "http://inventory.local:8000/");
        set("REMOTE_TIMEOUT_MS", "2500");
        set("REMOTE_MAX_RETRIES", "0");
        set("LOW_STOCK_THRESHOLD", "5.5");
        set("STATUS_POLL_INTERVAL_SECS", "10");

        let config = Config::from_env();
        assert_eq!(config.port, 9090);
        assert_eq!(config.low_stock_threshold, "5.5".parse::<Decimal>().unwrap());
        assert_eq!(config.status_poll_interval, Duration::from_secs(10));

        let remote = config.remote();
        assert_eq!(remote.base_url, "http://inventory.local:8000");
        assert_eq!(remote.timeout, Duration::from_millis(2500));
        assert_eq!(remote.max_retries, 0);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_bad_values() {
        clear_env();
        set("PORT", "not-a-port");
        set("LOW_STOCK_THRESHOLD", "-1");
        set("STATUS_POLL_INTERVAL_SECS", "0");

        assert_eq!(Config::from_env(), Config::default());
        clear_env();
    }
}
