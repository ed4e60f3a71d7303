use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, instrument};

use super::service::PromptService;

/// Configuration for the expiry purge task
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often expired guess keys are purged
    pub purge_interval: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            purge_interval: Duration::from_secs(30 * 60), // 30 minutes
        }
    }
}

/// Periodically drops live guess keys whose prompt has expired
#[instrument(skip(service))]
pub async fn start_cleanup_task(service: PromptService, config: CleanupConfig) {
    info!(
        purge_interval_secs = config.purge_interval.as_secs(),
        "Starting expired prompt cleanup task"
    );

    let mut purge_interval = interval(config.purge_interval);

    loop {
        purge_interval.tick().await;

        match service.purge_expired().await {
            Ok(removed) => info!(removed, "Expired prompt keys purged"),
            Err(e) => error!(error = %e, "Expired prompt purge failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PromptSettings;
    use crate::prompt::repository::InMemoryPromptRepository;
    use crate::store::{GuessStore, InMemoryGuessStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_purges_expired_keys_on_tick() {
        let store = Arc::new(InMemoryGuessStore::new());
        store.increment_guess_count("old", "squid").await.unwrap();
        store
            .expire_session("old", chrono::Duration::seconds(-1))
            .await
            .unwrap();

        let service = PromptService::new(
            Arc::new(InMemoryPromptRepository::new()),
            store.clone(),
            PromptSettings::default(),
        );
        let task = tokio::spawn(start_cleanup_task(
            service,
            CleanupConfig {
                purge_interval: Duration::from_millis(10),
            },
        ));

        for _ in 0..50 {
            if store.session_count().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        task.abort();

        assert_eq!(store.session_count().await, 0);
    }
}
