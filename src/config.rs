// config.rs
use std::env;
use std::time::Duration;

use log::warn;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_STORAGE_DIR: &str = "memory";
pub const DEFAULT_DELAY_MS: u64 = 1500;
pub const DEFAULT_SALE_VALUE: f64 = 45.0;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_SESSION_TTL_MINS: u64 = 60;

/// Runtime settings, read from the environment after `dotenv` has run.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub storage_dir: String,
    pub simulated_delay: Duration,
    pub average_sale_value: f64,
    pub api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
    pub meta_token: Option<String>,
    pub meta_ad_account_id: Option<String>,
    pub interactive: bool,
    /// Open onboarding sessions kept in memory before the oldest is evicted.
    pub max_sessions: usize,
    /// Idle time after which an onboarding session is dropped.
    pub session_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            storage_dir: DEFAULT_STORAGE_DIR.to_string(),
            simulated_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            average_sale_value: DEFAULT_SALE_VALUE,
            api_key: None,
            unsplash_access_key: None,
            meta_token: None,
            meta_ad_account_id: None,
            interactive: true,
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_MINS * 60),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let simulated_delay = match non_empty("TUKI_SIMULATED_DELAY_MS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    warn!("Invalid TUKI_SIMULATED_DELAY_MS '{}', using {}ms", raw, DEFAULT_DELAY_MS);
                    defaults.simulated_delay
                }
            },
            None => defaults.simulated_delay,
        };

        let average_sale_value = match non_empty("TUKI_SALE_VALUE") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => v,
                _ => {
                    warn!("Invalid TUKI_SALE_VALUE '{}', using {}", raw, DEFAULT_SALE_VALUE);
                    defaults.average_sale_value
                }
            },
            None => defaults.average_sale_value,
        };

        let max_sessions = match non_empty("TUKI_MAX_SESSIONS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!("Invalid TUKI_MAX_SESSIONS '{}', using {}", raw, DEFAULT_MAX_SESSIONS);
                    defaults.max_sessions
                }
            },
            None => defaults.max_sessions,
        };

        let session_ttl = match non_empty("TUKI_SESSION_TTL_MINS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(mins) if mins > 0 => Duration::from_secs(mins.saturating_mul(60)),
                _ => {
                    warn!("Invalid TUKI_SESSION_TTL_MINS '{}', using {}", raw, DEFAULT_SESSION_TTL_MINS);
                    defaults.session_ttl
                }
            },
            None => defaults.session_ttl,
        };

        let interactive = non_empty("TUKI_INTERACTIVE")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(defaults.interactive);

        Config {
            bind_addr: non_empty("TUKI_BIND_ADDR").unwrap_or(defaults.bind_addr),
            storage_dir: non_empty("TUKI_STORAGE_DIR").unwrap_or(defaults.storage_dir),
            simulated_delay,
            average_sale_value,
            api_key: non_empty("TUKI_API_KEY"),
            unsplash_access_key: non_empty("UNSPLASH_ACCESS_KEY"),
            meta_token: non_empty("META_TOKEN"),
            meta_ad_account_id: non_empty("META_AD_ACCOUNT_ID"),
            interactive,
            max_sessions,
            session_ttl,
        }
    }
}
