use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::models::PromptModel;
use crate::store::StoreError;

/// Result of attempting to close a prompt
#[derive(Debug, Clone)]
pub enum ClosePromptResult {
    /// The prompt was open and is now closed
    Closed(PromptModel),
    /// The prompt had already been closed
    AlreadyClosed,
    /// Prompt does not exist
    NotFound,
}

/// Trait for prompt repository operations
#[async_trait]
pub trait PromptRepository: Send + Sync {
    async fn create_prompt(&self, prompt: &PromptModel) -> Result<(), StoreError>;
    async fn get_prompt(&self, prompt_id: &str) -> Result<Option<PromptModel>, StoreError>;

    /// Atomically flips an open prompt to closed so no further guesses are accepted
    async fn close_prompt(&self, prompt_id: &str) -> Result<ClosePromptResult, StoreError>;
}

/// In-memory implementation of PromptRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryPromptRepository {
    prompts: RwLock<HashMap<String, PromptModel>>,
}

impl InMemoryPromptRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptRepository for InMemoryPromptRepository {
    #[instrument(skip(self, prompt))]
    async fn create_prompt(&self, prompt: &PromptModel) -> Result<(), StoreError> {
        debug!(prompt_id = %prompt.id, creator = %prompt.creator, "Creating prompt in memory");

        let mut prompts = self.prompts.write().await;
        if prompts.contains_key(&prompt.id) {
            warn!(prompt_id = %prompt.id, "Prompt already exists in memory");
            return Err(StoreError::Duplicate(prompt.id.clone()));
        }
        prompts.insert(prompt.id.clone(), prompt.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_prompt(&self, prompt_id: &str) -> Result<Option<PromptModel>, StoreError> {
        let prompts = self.prompts.read().await;
        let prompt = prompts.get(prompt_id).cloned();

        if prompt.is_none() {
            debug!(prompt_id = %prompt_id, "Prompt not found in memory");
        }
        Ok(prompt)
    }

    #[instrument(skip(self))]
    async fn close_prompt(&self, prompt_id: &str) -> Result<ClosePromptResult, StoreError> {
        let mut prompts = self.prompts.write().await;

        let prompt = match prompts.get_mut(prompt_id) {
            Some(prompt) => prompt,
            None => return Ok(ClosePromptResult::NotFound),
        };

        if !prompt.is_open() {
            debug!(prompt_id = %prompt_id, "Prompt already closed");
            return Ok(ClosePromptResult::AlreadyClosed);
        }

        prompt.close();
        info!(prompt_id = %prompt_id, "Prompt closed");
        Ok(ClosePromptResult::Closed(prompt.clone()))
    }
}
