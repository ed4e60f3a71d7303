//! Guess aggregation and consensus scoring.
//!
//! Pure and synchronous: callers fetch counts from the store and hand
//! them in, nothing here touches persisted state.

pub mod grouping;
pub mod models;
pub mod normalizer;
pub mod results;
pub mod scoring;
pub mod similarity;

use std::collections::BTreeMap;

pub use grouping::group_similar;
pub use models::*;
pub use normalizer::normalize;
pub use results::{assemble, percentage_of, AssemblyInput};
pub use scoring::score;
pub use similarity::similarity;

/// Normalized guess text to the number of players who submitted it.
///
/// Ordered so that equal counts group and rank deterministically.
pub type GuessCounts = BTreeMap<String, u64>;
