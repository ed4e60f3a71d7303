use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{PromptModel, PromptStatus};
use crate::aggregation::AggregatedResults;

/// Request payload for creating a new prompt
#[derive(Debug, Deserialize)]
pub struct CreatePromptRequest {
    pub creator: String,
    pub description: String,
    pub answer: String,
}

/// Prompt details. The creator's answer is only revealed once the prompt is closed.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    pub id: String,
    pub creator: String,
    pub description: String,
    pub status: PromptStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl From<PromptModel> for PromptResponse {
    fn from(prompt: PromptModel) -> Self {
        let answer = (!prompt.is_open()).then_some(prompt.answer);
        Self {
            id: prompt.id,
            creator: prompt.creator,
            description: prompt.description,
            status: prompt.status,
            created_at: prompt.created_at,
            closed_at: prompt.closed_at,
            answer,
        }
    }
}

/// Request payload for submitting a guess
#[derive(Debug, Deserialize)]
pub struct SubmitGuessRequest {
    pub player: String,
    pub guess: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitGuessResponse {
    /// The guess as it was stored, after normalization
    pub guess: String,
    pub count: u64,
    pub total_players: u64,
}

/// Query string for results endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ResultsQuery {
    pub player: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsResponse {
    pub prompt_id: String,
    #[serde(flatten)]
    pub results: AggregatedResults,
    /// Some store reads failed and fallbacks were used
    pub partial: bool,
}
