mod errors;
pub mod models;
pub mod outcome;
pub mod repository;
pub mod retry;

pub use errors::StoreError;
pub use models::FrozenSnapshot;
pub use outcome::{PartialRead, ReadOutcome};
pub use repository::{GuessStore, InMemoryGuessStore};
pub use retry::{RetryPolicy, RetryingGuessStore};
