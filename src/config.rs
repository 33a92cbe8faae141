use std::{path::PathBuf, time::Duration};

use crate::{api::DEFAULT_API_BASE_URL, breathing::DEFAULT_TICK_INTERVAL};

pub const ENV_API_URL: &str = "CESIZEN_API_URL";
pub const ENV_DATA_DIR: &str = "CESIZEN_DATA_DIR";
pub const ENV_TICK_MS: &str = "CESIZEN_TICK_MS";
pub const ENV_DEBUG: &str = "CESIZEN_DEBUG";

const AUTH_FILE: &str = "auth.json";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub tick_interval: Duration,
    pub request_timeout: Duration,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: default_data_dir(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let tick_interval = match get(ENV_TICK_MS).map(|raw| raw.trim().parse::<u64>()) {
            Some(Ok(ms)) if ms > 0 => Duration::from_millis(ms),
            Some(_) => {
                log::warn!("Ignoring invalid {ENV_TICK_MS}; using default tick interval");
                defaults.tick_interval
            }
            None => defaults.tick_interval,
        };

        Self {
            api_base_url: get(ENV_API_URL).unwrap_or(defaults.api_base_url),
            data_dir: get(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            tick_interval,
            request_timeout: defaults.request_timeout,
            debug: get(ENV_DEBUG)
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    pub fn with_api_base_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.api_base_url = url;
        }
        self
    }

    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }

    pub fn auth_file(&self) -> PathBuf {
        self.data_dir.join(AUTH_FILE)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".cesizen"))
        .unwrap_or_else(|| PathBuf::from(".cesizen"))
}
