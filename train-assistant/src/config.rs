//! Startup configuration from environment variables.
//!
//! Every variable is optional. Empty values count as unset; values that are
//! present but unparseable are reported as [`ConfigError`].

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::assistant::AssistantConfig;
use crate::cache::CacheConfig;
use crate::nlu::NluConfig;
use crate::railstatus::RailStatusConfig;

/// Default timetable file.
const DEFAULT_DATA_FILE: &str = "data/final_train_data_by_train_no.json";

/// Default listen address.
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 5000);

/// An environment variable that could not be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{var}: invalid value {value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Timetable JSON file
    pub data_file: PathBuf,

    /// Listen address
    pub bind_addr: SocketAddr,

    /// How often to reload the timetable; `None` disables reloading
    pub reload_interval: Option<Duration>,

    /// Query answering tunables
    pub assistant: AssistantConfig,

    /// NLU endpoints (each optional)
    pub nlu: NluConfig,

    /// Rail-status API; `None` disables live lookups
    pub rail: Option<RailStatusConfig>,

    /// Rail-status response cache
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::default();

        if let Some(path) = var("TRAIN_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        if let Some(addr) = parse(&var, "BIND_ADDR")? {
            config.bind_addr = addr;
        }
        if let Some(secs) = parse::<u64>(&var, "TIMETABLE_RELOAD_SECS")? {
            config.reload_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(cutoff) = parse(&var, "FUZZY_CUTOFF")? {
            config.assistant = config
                .assistant
                .with_fuzzy_cutoff(unit_interval("FUZZY_CUTOFF", cutoff)?);
        }
        if let Some(threshold) = parse(&var, "NLU_CONFIDENCE")? {
            config.assistant = config
                .assistant
                .with_nlu_confidence(unit_interval("NLU_CONFIDENCE", threshold)?);
        }
        if let Some(ms) = parse::<u64>(&var, "COLLABORATOR_TIMEOUT_MS")? {
            config.assistant = config
                .assistant
                .with_collaborator_timeout(Duration::from_millis(ms));
        }
        let timeout_ms = duration_ms(config.assistant.collaborator_timeout);

        config.nlu = config.nlu.with_timeout_ms(timeout_ms);
        if let Some(url) = var("NLU_CLASSIFIER_URL") {
            config.nlu = config.nlu.with_classifier_url(url);
        }
        if let Some(url) = var("NLU_NER_URL") {
            config.nlu = config.nlu.with_entities_url(url);
        }
        if let Some(token) = var("NLU_API_TOKEN") {
            config.nlu = config.nlu.with_token(token);
        }

        config.rail = var("RAIL_API_KEY").map(|key| {
            let rail = RailStatusConfig::new(key).with_timeout_ms(timeout_ms);
            match var("RAIL_API_URL") {
                Some(url) => rail.with_base_url(url),
                None => rail,
            }
        });
        if let Some(secs) = parse::<u64>(&var, "RAIL_CACHE_TTL_SECS")? {
            config.cache = config.cache.with_ttl(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Set the timetable file.
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    /// Set the listen address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the reload interval.
    pub fn with_reload_interval(mut self, interval: Option<Duration>) -> Self {
        self.reload_interval = interval;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            reload_interval: None,
            assistant: AssistantConfig::default(),
            nlu: NluConfig::default(),
            rail: None,
            cache: CacheConfig::default(),
        }
    }
}

fn parse<T>(var: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = var(key) else {
        return Ok(None);
    };
    value.parse().map(Some).map_err(|e: T::Err| ConfigError {
        var: key,
        reason: e.to_string(),
        value,
    })
}

fn unit_interval(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError {
            var: key,
            value: value.to_string(),
            reason: "must be between 0 and 1".to_string(),
        })
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.reload_interval, None);
        assert_eq!(config.assistant.fuzzy_cutoff, 0.75);
        assert_eq!(config.assistant.nlu_confidence, 0.5);
        assert_eq!(config.assistant.collaborator_timeout, Duration::from_millis(3000));
        assert!(!config.nlu.is_enabled());
        assert!(config.rail.is_none());
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("TRAIN_DATA_FILE", "/srv/trains.json"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("TIMETABLE_RELOAD_SECS", "600"),
            ("FUZZY_CUTOFF", "0.8"),
            ("NLU_CONFIDENCE", "0.65"),
            ("COLLABORATOR_TIMEOUT_MS", "250"),
            ("NLU_CLASSIFIER_URL", "http://nlu/classify"),
            ("NLU_API_TOKEN", "tok"),
            ("RAIL_API_KEY", "key"),
            ("RAIL_API_URL", "http://rail/api"),
            ("RAIL_CACHE_TTL_SECS", "60"),
        ])
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/srv/trains.json"));
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.reload_interval, Some(Duration::from_secs(600)));
        assert_eq!(config.assistant.fuzzy_cutoff, 0.8);
        assert_eq!(config.assistant.nlu_confidence, 0.65);
        assert_eq!(config.assistant.collaborator_timeout, Duration::from_millis(250));
        assert_eq!(config.nlu.classifier_url.as_deref(), Some("http://nlu/classify"));
        assert_eq!(config.nlu.entities_url, None);
        assert_eq!(config.nlu.api_token.as_deref(), Some("tok"));
        assert_eq!(config.nlu.timeout_ms, 250);

        let rail = config.rail.unwrap();
        assert_eq!(rail.api_key, "key");
        assert_eq!(rail.base_url, "http://rail/api");
        assert_eq!(rail.timeout_ms, 250);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
    }

    #[test]
    fn empty_values_are_unset() {
        let config = config(&[("BIND_ADDR", "  "), ("RAIL_API_KEY", "")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse().unwrap());
        assert!(config.rail.is_none());
    }

    #[test]
    fn zero_reload_disables() {
        let config = config(&[("TIMETABLE_RELOAD_SECS", "0")]).unwrap();
        assert_eq!(config.reload_interval, None);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = config(&[("BIND_ADDR", "nowhere")]).unwrap_err();
        assert_eq!(err.var, "BIND_ADDR");
        assert_eq!(err.value, "nowhere");

        let err = config(&[("FUZZY_CUTOFF", "1.5")]).unwrap_err();
        assert_eq!(err.var, "FUZZY_CUTOFF");

        let err = config(&[("TIMETABLE_RELOAD_SECS", "-1")]).unwrap_err();
        assert_eq!(err.var, "TIMETABLE_RELOAD_SECS");
    }

    #[test]
    fn builders() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let config = AppConfig::default()
            .with_data_file("x.json")
            .with_bind_addr(addr)
            .with_reload_interval(Some(Duration::from_secs(5)));
        assert_eq!(config.data_file, PathBuf::from("x.json"));
        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.reload_interval, Some(Duration::from_secs(5)));
    }
}
