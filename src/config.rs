use chrono::Duration;
use tracing::warn;

use crate::{aggregation::AggregationConfig, store::RetryPolicy};

/// Longest lifetime accepted for live guess keys.
pub const MAX_SESSION_TTL_DAYS: u64 = 3650;

/// Settings the prompt service runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromptSettings {
    pub aggregation: AggregationConfig,
    /// How long live guess keys are kept after a prompt is created.
    pub session_ttl: Duration,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            aggregation: AggregationConfig::default(),
            session_ttl: Duration::days(30),
        }
    }
}

/// Process configuration, read from `CROWDGUESS_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub prompt: PromptSettings,
    pub store_retry: RetryPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str, default: u64| -> u64 {
            match lookup(key) {
                Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                    warn!(key, value = %raw, default, "Ignoring unparsable config value");
                    default
                }),
                None => default,
            }
        };

        let mut ttl_days = parse("CROWDGUESS_SESSION_TTL_DAYS", 30);
        if ttl_days > MAX_SESSION_TTL_DAYS {
            warn!(ttl_days, max = MAX_SESSION_TTL_DAYS, "Clamping session ttl");
            ttl_days = MAX_SESSION_TTL_DAYS;
        }
        let attempts = parse("CROWDGUESS_STORE_RETRY_ATTEMPTS", 2);
        let backoff_ms = parse("CROWDGUESS_STORE_RETRY_BACKOFF_MS", 50);

        Self {
            bind_addr: lookup("CROWDGUESS_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            prompt: PromptSettings {
                aggregation: AggregationConfig::default(),
                session_ttl: Duration::days(ttl_days as i64),
            },
            store_retry: RetryPolicy {
                attempts: attempts.min(u32::MAX as u64) as u32,
                backoff: std::time::Duration::from_millis(backoff_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GuessStore, InMemoryGuessStore};
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]);

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.prompt, PromptSettings::default());
        assert_eq!(config.store_retry, RetryPolicy::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[
            ("CROWDGUESS_BIND_ADDR", "127.0.0.1:8080"),
            ("CROWDGUESS_SESSION_TTL_DAYS", "7"),
            ("CROWDGUESS_STORE_RETRY_ATTEMPTS", "4"),
            ("CROWDGUESS_STORE_RETRY_BACKOFF_MS", "10"),
        ]);

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.prompt.session_ttl, Duration::days(7));
        assert_eq!(config.store_retry.attempts, 4);
        assert_eq!(config.store_retry.backoff, std::time::Duration::from_millis(10));
    }

    #[test]
    fn test_unparsable_values_fall_back_to_defaults() {
        let config = config_from(&[("CROWDGUESS_STORE_RETRY_ATTEMPTS", "lots")]);
        assert_eq!(config.store_retry.attempts, 2);
    }

    #[tokio::test]
    async fn test_huge_session_ttl_is_clamped() {
        let config = config_from(&[("CROWDGUESS_SESSION_TTL_DAYS", "100000000")]);
        assert_eq!(
            config.prompt.session_ttl,
            Duration::days(MAX_SESSION_TTL_DAYS as i64)
        );

        let store = InMemoryGuessStore::new();
        store
            .expire_session("s1", config.prompt.session_ttl)
            .await
            .unwrap();
        assert_eq!(store.purge_expired().await.unwrap(), 0);
    }
}
