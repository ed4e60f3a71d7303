use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptStatus {
    Open,
    Closed,
}

/// One live instance of a creator's prompt being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptModel {
    pub id: String, // UUID v4, also the key every guess is stored under
    pub creator: String,
    pub description: String,
    pub answer: String, // as the creator typed it
    pub status: PromptStatus,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl PromptModel {
    /// Creates an open prompt with a generated ID
    pub fn new(creator: String, description: String, answer: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            creator,
            description,
            answer,
            status: PromptStatus::Open,
            created_at: Utc::now(),
            closed_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PromptStatus::Open
    }

    pub fn close(&mut self) {
        self.status = PromptStatus::Closed;
        self.closed_at = Some(Utc::now());
    }
}
