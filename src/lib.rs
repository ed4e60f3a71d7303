// Library crate for the crowd guessing game server
// This file exposes the public API for integration tests

pub mod aggregation;
pub mod config;
pub mod prompt;
pub mod shared;
pub mod store;

// Re-export commonly used types for easier access in tests
pub use aggregation::{AggregatedResults, AggregationConfig, ConsensusScore, RankedEntry, Tier};
pub use config::{AppConfig, PromptSettings};
pub use prompt::PromptService;
pub use shared::{AppError, AppState};
pub use store::{GuessStore, InMemoryGuessStore, RetryingGuessStore, StoreError};
