//! Application configuration

pub mod catalog;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub use catalog::{
    AppointmentType, BookingCatalog, Catalog, ChatCatalog, ConfigError, DashboardCatalog,
    HealthInsight, PhotoCatalog, TimeSlot, UpcomingAppointment,
};

const DEFAULT_REPLY_DELAY_MS: u64 = 1500;
const DEFAULT_ANALYSIS_DELAY_MS: u64 = 3000;
const DEFAULT_TRIAL_SUBMIT_DELAY_MS: u64 = 2000;

/// Simulated latencies for every fake round-trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Delay before Dr. Paw answers a chat message
    pub reply_delay: Duration,

    /// Delay between "analyzing" and the photo result
    pub analysis_delay: Duration,

    /// How long the trial signup spends in the submitting state
    pub trial_submit_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
            analysis_delay: Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS),
            trial_submit_delay: Duration::from_millis(DEFAULT_TRIAL_SUBMIT_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub timings: Timings,
    /// Fixed seed for canned-response selection; entropy when unset
    pub rng_seed: Option<u64>,
    /// Optional TOML catalog overriding the built-in one
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let millis = |key: &str, default: u64| {
            Duration::from_millis(
                lookup(key)
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(default),
            )
        };

        Self {
            timings: Timings {
                reply_delay: millis("CREST_REPLY_DELAY_MS", DEFAULT_REPLY_DELAY_MS),
                analysis_delay: millis("CREST_ANALYSIS_DELAY_MS", DEFAULT_ANALYSIS_DELAY_MS),
                trial_submit_delay: millis(
                    "CREST_TRIAL_SUBMIT_DELAY_MS",
                    DEFAULT_TRIAL_SUBMIT_DELAY_MS,
                ),
            },
            rng_seed: lookup("CREST_RNG_SEED").and_then(|v| v.trim().parse().ok()),
            catalog_path: lookup("CREST_CATALOG")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Load the catalog named by `catalog_path`, or the built-in one
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => Catalog::from_file(path),
            None => Ok(Catalog::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.timings, Timings::default());
        assert_eq!(config.timings.reply_delay, Duration::from_millis(1500));
        assert_eq!(config.timings.analysis_delay, Duration::from_secs(3));
        assert_eq!(config.timings.trial_submit_delay, Duration::from_secs(2));
        assert!(config.rng_seed.is_none());
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("CREST_REPLY_DELAY_MS", "10"),
            ("CREST_ANALYSIS_DELAY_MS", " 20 "),
            ("CREST_RNG_SEED", "42"),
            ("CREST_CATALOG", "catalog.toml"),
        ]));
        assert_eq!(config.timings.reply_delay, Duration::from_millis(10));
        assert_eq!(config.timings.analysis_delay, Duration::from_millis(20));
        assert_eq!(config.timings.trial_submit_delay, Duration::from_secs(2));
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.toml")));
    }

    #[test]
    fn test_garbage_falls_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("CREST_REPLY_DELAY_MS", "soon"),
            ("CREST_RNG_SEED", "-1"),
            ("CREST_CATALOG", "  "),
        ]));
        assert_eq!(config.timings.reply_delay, Duration::from_millis(1500));
        assert!(config.rng_seed.is_none());
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_builtin_catalog_without_path() {
        let catalog = Config::default().load_catalog().unwrap();
        assert_eq!(catalog.chat.replies.len(), 5);
    }
}
