use async_trait::async_trait;
use chrono::Duration;
use std::future::Future;
use tracing::{error, warn};

use super::{models::FrozenSnapshot, GuessStore, StoreError};
use crate::aggregation::GuessCounts;

/// How many times a store call is attempted and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub attempts: u32,
    /// Wait before the first retry, doubled for each later one.
    pub backoff: std::time::Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            backoff: std::time::Duration::from_millis(50),
        }
    }
}

/// Wraps a GuessStore so idempotent calls are retried with backoff before failing.
///
/// `increment_guess_count` and `try_mark_guessed` are attempted once. A backend
/// may apply either write and still report an error, and repeating it would
/// count the guess twice or refuse the player's own first guess.
pub struct RetryingGuessStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: GuessStore> RetryingGuessStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        session_id: &str,
        mut call: F,
    ) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, StoreError>> + Send,
        T: Send,
    {
        let attempts = self.policy.attempts.max(1);
        let mut delay = self.policy.backoff;
        let mut attempt = 1;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < attempts => {
                    warn!(
                        operation,
                        session_id = %session_id,
                        attempt,
                        error = %err,
                        "Store call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(err) => {
                    error!(
                        operation,
                        session_id = %session_id,
                        attempts,
                        error = %err,
                        "Store call failed after retries"
                    );
                    return Err(err);
                }
            }
        }
    }
}

#[async_trait]
impl<S: GuessStore> GuessStore for RetryingGuessStore<S> {
    async fn increment_guess_count(&self, session_id: &str, guess: &str) -> Result<u64, StoreError> {
        self.inner
            .increment_guess_count(session_id, guess)
            .await
            .inspect_err(|err| {
                error!(session_id = %session_id, error = %err, "Increment failed, not retried")
            })
    }

    async fn register_player(&self, session_id: &str, player_id: &str) -> Result<u64, StoreError> {
        let inner = &self.inner;
        self.with_retry("register_player", session_id, move || {
            inner.register_player(session_id, player_id)
        })
        .await
    }

    async fn record_player_guess(
        &self,
        session_id: &str,
        player_id: &str,
        guess: &str,
    ) -> Result<(), StoreError> {
        let inner = &self.inner;
        self.with_retry("record_player_guess", session_id, move || {
            inner.record_player_guess(session_id, player_id, guess)
        })
        .await
    }

    async fn try_mark_guessed(&self, session_id: &str, player_id: &str) -> Result<bool, StoreError> {
        self.inner
            .try_mark_guessed(session_id, player_id)
            .await
            .inspect_err(|err| {
                error!(session_id = %session_id, error = %err, "Marking player failed, not retried")
            })
    }

    async fn unmark_guessed(&self, session_id: &str, player_id: &str) -> Result<(), StoreError> {
        let inner = &self.inner;
        self.with_retry("unmark_guessed", session_id, move || {
            inner.unmark_guessed(session_id, player_id)
        })
        .await
    }

    async fn get_all_guess_counts(&self, session_id: &str) -> Result<GuessCounts, StoreError> {
        let inner = &self.inner;
        self.with_retry("get_all_guess_counts", session_id, move || {
            inner.get_all_guess_counts(session_id)
        })
        .await
    }

    async fn get_distinct_player_count(&self, session_id: &str) -> Result<u64, StoreError> {
        let inner = &self.inner;
        self.with_retry("get_distinct_player_count", session_id, move || {
            inner.get_distinct_player_count(session_id)
        })
        .await
    }

    async fn get_player_guess(
        &self,
        session_id: &str,
        player_id: &str,
    ) -> Result<Option<String>, StoreError> {
        let inner = &self.inner;
        self.with_retry("get_player_guess", session_id, move || {
            inner.get_player_guess(session_id, player_id)
        })
        .await
    }

    async fn freeze_final_snapshot(
        &self,
        session_id: &str,
        snapshot: &FrozenSnapshot,
    ) -> Result<(), StoreError> {
        let inner = &self.inner;
        self.with_retry("freeze_final_snapshot", session_id, move || {
            inner.freeze_final_snapshot(session_id, snapshot)
        })
        .await
    }

    async fn read_frozen_snapshot(
        &self,
        session_id: &str,
    ) -> Result<Option<FrozenSnapshot>, StoreError> {
        let inner = &self.inner;
        self.with_retry("read_frozen_snapshot", session_id, move || {
            inner.read_frozen_snapshot(session_id)
        })
        .await
    }

    async fn expire_session(&self, session_id: &str, ttl: Duration) -> Result<(), StoreError> {
        let inner = &self.inner;
        self.with_retry("expire_session", session_id, move || {
            inner.expire_session(session_id, ttl)
        })
        .await
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let inner = &self.inner;
        self.with_retry("purge_expired", "*", move || inner.purge_expired())
            .await
    }
}
