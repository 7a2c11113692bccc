// src/config.rs
use crate::errors::BreedSenseError;
use std::time::Duration;

/// Simulated backend latencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub analysis: Duration,
    pub search: Duration,
    pub chat: Duration,
    pub locate: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            analysis: Duration::from_millis(3000),
            search: Duration::from_millis(2000),
            chat: Duration::from_millis(1500),
            locate: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub timings: Timings,
    pub chat_seed: Option<u64>,
    /// Pages untouched for this long are unmounted.
    pub page_ttl: Duration,
    pub eviction_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, BreedSenseError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BreedSenseError> {
        let defaults = Timings::default();
        let millis = |key: &str, default: Duration| -> Result<Duration, BreedSenseError> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| BreedSenseError::Config(format!("{}={:?}: {}", key, raw, e))),
                None => Ok(default),
            }
        };

        let timings = Timings {
            analysis: millis("BREEDSENSE_ANALYSIS_DELAY_MS", defaults.analysis)?,
            search: millis("BREEDSENSE_SEARCH_DELAY_MS", defaults.search)?,
            chat: millis("BREEDSENSE_CHAT_DELAY_MS", defaults.chat)?,
            locate: millis("BREEDSENSE_LOCATE_DELAY_MS", defaults.locate)?,
        };

        let secs = |key: &str, default: u64| -> Result<Duration, BreedSenseError> {
            let Some(raw) = lookup(key) else {
                return Ok(Duration::from_secs(default));
            };
            match raw.trim().parse::<u64>() {
                Ok(0) => Err(BreedSenseError::Config(format!("{} must be positive", key))),
                Ok(value) => Ok(Duration::from_secs(value)),
                Err(e) => Err(BreedSenseError::Config(format!("{}={:?}: {}", key, raw, e))),
            }
        };

        let chat_seed = lookup("BREEDSENSE_CHAT_SEED")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    BreedSenseError::Config(format!("BREEDSENSE_CHAT_SEED={:?}: {}", raw, e))
                })
            })
            .transpose()?;

        Ok(Self {
            bind: lookup("BREEDSENSE_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            timings,
            chat_seed,
            page_ttl: secs("BREEDSENSE_PAGE_TTL_SECS", 1800)?,
            eviction_interval: secs("BREEDSENSE_EVICTION_INTERVAL_SECS", 60)?,
        })
    }
}
