use std::sync::Arc;

use crowdguess::{
    prompt::{
        repository::InMemoryPromptRepository,
        types::{CreatePromptRequest, SubmitGuessRequest},
        PromptService,
    },
    store::{InMemoryGuessStore, RetryPolicy, RetryingGuessStore},
    PromptSettings,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: Arc<PromptService>,
    pub prompt_id: String,
}

pub struct TestSetupBuilder {
    answer: String,
    settings: PromptSettings,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            answer: "jellyfish".to_string(),
            settings: PromptSettings::default(),
        }
    }

    pub fn with_answer(mut self, answer: &str) -> Self {
        self.answer = answer.to_string();
        self
    }

    pub async fn build(self) -> TestSetup {
        let store = RetryingGuessStore::new(
            InMemoryGuessStore::new(),
            RetryPolicy {
                attempts: 2,
                backoff: std::time::Duration::from_millis(1),
            },
        );
        let service = Arc::new(PromptService::new(
            Arc::new(InMemoryPromptRepository::new()),
            Arc::new(store),
            self.settings,
        ));

        let prompt = service
            .create_prompt(CreatePromptRequest {
                creator: "maker".to_string(),
                description: "a bell with trailing lines".to_string(),
                answer: self.answer,
            })
            .await
            .expect("prompt creation should succeed");

        TestSetup {
            service,
            prompt_id: prompt.id,
        }
    }
}

impl TestSetup {
    pub async fn guess(&self, player: &str, guess: &str) {
        self.service
            .submit_guess(
                &self.prompt_id,
                SubmitGuessRequest {
                    player: player.to_string(),
                    guess: guess.to_string(),
                },
            )
            .await
            .unwrap_or_else(|e| panic!("guess {guess:?} from {player} failed: {e}"));
    }

    /// Submits `count` guesses of the same text from distinct generated players.
    pub async fn guesses(&self, prefix: &str, guess: &str, count: usize) {
        for i in 0..count {
            self.guess(&format!("{prefix}-{i}"), guess).await;
        }
    }
}
