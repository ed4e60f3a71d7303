use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::{models::FrozenSnapshot, StoreError};
use crate::aggregation::GuessCounts;

/// Persistence the guess engine needs, keyed by prompt session id.
///
/// Every write is atomic per call. Increments must never be lost under
/// concurrent callers and registering the same player twice must not
/// change the distinct count.
#[async_trait]
pub trait GuessStore: Send + Sync {
    /// Adds one to the count for a normalized guess and returns the new count.
    async fn increment_guess_count(&self, session_id: &str, guess: &str) -> Result<u64, StoreError>;

    /// Adds the player to the session's registry and returns the distinct player count.
    async fn register_player(&self, session_id: &str, player_id: &str) -> Result<u64, StoreError>;

    async fn record_player_guess(
        &self,
        session_id: &str,
        player_id: &str,
        guess: &str,
    ) -> Result<(), StoreError>;

    /// Set-if-absent flag marking that the player has guessed. Only the first caller gets `true`.
    async fn try_mark_guessed(&self, session_id: &str, player_id: &str) -> Result<bool, StoreError>;

    /// Clears the guessed flag so a submission that failed partway can be retried.
    async fn unmark_guessed(&self, session_id: &str, player_id: &str) -> Result<(), StoreError>;

    async fn get_all_guess_counts(&self, session_id: &str) -> Result<GuessCounts, StoreError>;
    async fn get_distinct_player_count(&self, session_id: &str) -> Result<u64, StoreError>;
    async fn get_player_guess(
        &self,
        session_id: &str,
        player_id: &str,
    ) -> Result<Option<String>, StoreError>;

    async fn freeze_final_snapshot(
        &self,
        session_id: &str,
        snapshot: &FrozenSnapshot,
    ) -> Result<(), StoreError>;
    async fn read_frozen_snapshot(&self, session_id: &str)
        -> Result<Option<FrozenSnapshot>, StoreError>;

    /// Schedules the live keys of a session to expire. Frozen snapshots never expire.
    /// A ttl reaching past the latest representable time leaves the keys without expiry.
    async fn expire_session(&self, session_id: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Drops every live session whose expiry has passed, returning how many were removed.
    async fn purge_expired(&self) -> Result<u64, StoreError>;
}

/// Live keys for one prompt session.
#[derive(Debug, Default)]
struct SessionKeys {
    counts: GuessCounts,
    /// Player id to the time they were registered.
    players: HashMap<String, DateTime<Utc>>,
    guesses: HashMap<String, String>,
    guessed: HashSet<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl SessionKeys {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Default)]
struct Keyspace {
    sessions: HashMap<String, SessionKeys>,
    frozen: HashMap<String, FrozenSnapshot>,
}

impl Keyspace {
    /// Live keys for writing. Expired keys are dropped first, as a key-value store would.
    fn live_mut(&mut self, session_id: &str) -> &mut SessionKeys {
        let now = Utc::now();
        if self
            .sessions
            .get(session_id)
            .is_some_and(|keys| keys.is_expired(now))
        {
            debug!(session_id = %session_id, "Dropping expired session keys before write");
            self.sessions.remove(session_id);
        }
        self.sessions.entry(session_id.to_string()).or_default()
    }

    fn live(&self, session_id: &str) -> Option<&SessionKeys> {
        let now = Utc::now();
        self.sessions
            .get(session_id)
            .filter(|keys| !keys.is_expired(now))
    }
}

/// In-memory implementation of GuessStore for development and testing.
///
/// A single lock serializes writes, which makes every increment linearizable.
#[derive(Debug, Default)]
pub struct InMemoryGuessStore {
    keyspace: RwLock<Keyspace>,
}

impl InMemoryGuessStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions holding live keys, expired or not.
    pub async fn session_count(&self) -> usize {
        self.keyspace.read().await.sessions.len()
    }
}

#[async_trait]
impl GuessStore for InMemoryGuessStore {
    #[instrument(skip(self))]
    async fn increment_guess_count(&self, session_id: &str, guess: &str) -> Result<u64, StoreError> {
        let mut keyspace = self.keyspace.write().await;
        let count = keyspace
            .live_mut(session_id)
            .counts
            .entry(guess.to_string())
            .or_insert(0);
        *count += 1;

        debug!(new_count = *count, "Guess count incremented");
        Ok(*count)
    }

    #[instrument(skip(self))]
    async fn register_player(&self, session_id: &str, player_id: &str) -> Result<u64, StoreError> {
        let mut keyspace = self.keyspace.write().await;
        let players = &mut keyspace.live_mut(session_id).players;
        players
            .entry(player_id.to_string())
            .or_insert_with(Utc::now);

        debug!(distinct_players = players.len(), "Player registered");
        Ok(players.len() as u64)
    }

    #[instrument(skip(self))]
    async fn record_player_guess(
        &self,
        session_id: &str,
        player_id: &str,
        guess: &str,
    ) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;
        keyspace
            .live_mut(session_id)
            .guesses
            .insert(player_id.to_string(), guess.to_string());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn try_mark_guessed(&self, session_id: &str, player_id: &str) -> Result<bool, StoreError> {
        let mut keyspace = self.keyspace.write().await;
        let newly_marked = keyspace
            .live_mut(session_id)
            .guessed
            .insert(player_id.to_string());

        if !newly_marked {
            debug!("Player already marked as guessed");
        }
        Ok(newly_marked)
    }

    #[instrument(skip(self))]
    async fn unmark_guessed(&self, session_id: &str, player_id: &str) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;
        if let Some(keys) = keyspace.sessions.get_mut(session_id) {
            keys.guessed.remove(player_id);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_all_guess_counts(&self, session_id: &str) -> Result<GuessCounts, StoreError> {
        let keyspace = self.keyspace.read().await;
        Ok(keyspace
            .live(session_id)
            .map(|keys| keys.counts.clone())
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get_distinct_player_count(&self, session_id: &str) -> Result<u64, StoreError> {
        let keyspace = self.keyspace.read().await;
        Ok(keyspace
            .live(session_id)
            .map(|keys| keys.players.len() as u64)
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get_player_guess(
        &self,
        session_id: &str,
        player_id: &str,
    ) -> Result<Option<String>, StoreError> {
        let keyspace = self.keyspace.read().await;
        Ok(keyspace
            .live(session_id)
            .and_then(|keys| keys.guesses.get(player_id).cloned()))
    }

    #[instrument(skip(self, snapshot))]
    async fn freeze_final_snapshot(
        &self,
        session_id: &str,
        snapshot: &FrozenSnapshot,
    ) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;
        keyspace
            .frozen
            .insert(session_id.to_string(), snapshot.clone());

        info!(
            total_players = snapshot.total_players,
            total_guesses = snapshot.total_guesses,
            "Final snapshot frozen"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn read_frozen_snapshot(
        &self,
        session_id: &str,
    ) -> Result<Option<FrozenSnapshot>, StoreError> {
        let keyspace = self.keyspace.read().await;
        Ok(keyspace.frozen.get(session_id).cloned())
    }

    #[instrument(skip(self))]
    async fn expire_session(&self, session_id: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;
        let expires_at = Utc::now().checked_add_signed(ttl);
        if expires_at.is_none() {
            warn!(ttl_seconds = ttl.num_seconds(), "Session ttl out of range, keys will not expire");
        }
        keyspace.live_mut(session_id).expires_at = expires_at;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let mut keyspace = self.keyspace.write().await;
        let now = Utc::now();
        let initial_count = keyspace.sessions.len();

        keyspace.sessions.retain(|_, keys| !keys.is_expired(now));

        let removed_count = initial_count - keyspace.sessions.len();
        debug!(expired_sessions_removed = removed_count, "Expired sessions purged");
        Ok(removed_count as u64)
    }
}
