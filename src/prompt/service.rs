use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::{
    models::PromptModel,
    repository::{ClosePromptResult, PromptRepository},
    types::{
        CreatePromptRequest, PromptResponse, ResultsResponse, SubmitGuessRequest,
        SubmitGuessResponse,
    },
};
use crate::{
    aggregation::{assemble, normalize, AssemblyInput, GuessCounts},
    config::PromptSettings,
    shared::{AppError, AppState},
    store::{FrozenSnapshot, GuessStore, PartialRead, ReadOutcome, StoreError},
};

/// Counts and player data read for one results request.
#[derive(Debug)]
struct ResultsView {
    counts: GuessCounts,
    total_players: u64,
    player_guess: Option<String>,
}

/// Service for handling prompt and guess business logic
pub struct PromptService {
    prompts: Arc<dyn PromptRepository>,
    store: Arc<dyn GuessStore>,
    settings: PromptSettings,
}

impl PromptService {
    pub fn new(
        prompts: Arc<dyn PromptRepository>,
        store: Arc<dyn GuessStore>,
        settings: PromptSettings,
    ) -> Self {
        Self {
            prompts,
            store,
            settings,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::clone(&state.prompt_repository),
            Arc::clone(&state.guess_store),
            state.settings,
        )
    }

    /// Creates an open prompt and schedules its guess keys to expire
    #[instrument(skip(self, request), fields(creator = %request.creator))]
    pub async fn create_prompt(
        &self,
        request: CreatePromptRequest,
    ) -> Result<PromptResponse, AppError> {
        let creator = request.creator.trim();
        if creator.is_empty() {
            return Err(AppError::Validation("creator must not be empty".to_string()));
        }
        if request.description.trim().is_empty() {
            return Err(AppError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        if normalize(&request.answer).is_empty() {
            return Err(AppError::Validation("answer must not be empty".to_string()));
        }

        let prompt = PromptModel::new(
            creator.to_string(),
            request.description.trim().to_string(),
            request.answer.trim().to_string(),
        );
        self.prompts.create_prompt(&prompt).await?;
        self.store
            .expire_session(&prompt.id, self.settings.session_ttl)
            .await?;

        info!(prompt_id = %prompt.id, "Prompt created");
        Ok(prompt.into())
    }

    #[instrument(skip(self))]
    pub async fn get_prompt(&self, prompt_id: &str) -> Result<PromptResponse, AppError> {
        Ok(self.require_prompt(prompt_id).await?.into())
    }

    /// Records a player's single guess on an open prompt
    #[instrument(skip(self, request), fields(player = %request.player))]
    pub async fn submit_guess(
        &self,
        prompt_id: &str,
        request: SubmitGuessRequest,
    ) -> Result<SubmitGuessResponse, AppError> {
        let player = request.player.trim();
        if player.is_empty() {
            return Err(AppError::Validation("player must not be empty".to_string()));
        }
        let guess = normalize(&request.guess);
        if guess.is_empty() {
            return Err(AppError::Validation("guess must not be empty".to_string()));
        }

        let prompt = self.require_prompt(prompt_id).await?;
        if !prompt.is_open() {
            return Err(AppError::PromptClosed(prompt_id.to_string()));
        }

        if !self.store.try_mark_guessed(prompt_id, player).await? {
            debug!("Rejecting second guess from player");
            return Err(AppError::AlreadyGuessed);
        }

        // registering first keeps the player count at or above the guess count
        let counted = async {
            let total_players = self.store.register_player(prompt_id, player).await?;
            let count = self.store.increment_guess_count(prompt_id, &guess).await?;
            Ok::<_, StoreError>((count, total_players))
        }
        .await;
        let (count, total_players) = match counted {
            Ok(counted) => counted,
            Err(err) => {
                self.release_guess_flag(prompt_id, player).await;
                return Err(err.into());
            }
        };

        // the guess is already counted, so the flag stays set
        self.store
            .record_player_guess(prompt_id, player, &guess)
            .await
            .inspect_err(|err| error!(error = %err, "Guess counted but not recorded for player"))?;

        info!(guess = %guess, count, total_players, "Guess recorded");
        Ok(SubmitGuessResponse {
            guess,
            count,
            total_players,
        })
    }

    /// Leaderboard for a prompt as it currently stands
    #[instrument(skip(self))]
    pub async fn live_results(
        &self,
        prompt_id: &str,
        player: Option<&str>,
    ) -> Result<ResultsResponse, AppError> {
        let prompt = self.require_prompt(prompt_id).await?;
        let (view, partial) = self.load_live_view(prompt_id, player).await.into_result()?;

        Ok(self.respond(&prompt, view, partial))
    }

    /// Freezes the final counts and closes the prompt to further guesses
    #[instrument(skip(self))]
    pub async fn close_prompt(&self, prompt_id: &str) -> Result<PromptResponse, AppError> {
        let prompt = self.require_prompt(prompt_id).await?;
        if !prompt.is_open() {
            return Err(AppError::PromptClosed(prompt_id.to_string()));
        }

        let counts = self.store.get_all_guess_counts(prompt_id).await?;
        let total_players = self.store.get_distinct_player_count(prompt_id).await?;
        let snapshot = FrozenSnapshot::new(counts, total_players);
        self.store
            .freeze_final_snapshot(prompt_id, &snapshot)
            .await?;

        match self.prompts.close_prompt(prompt_id).await? {
            ClosePromptResult::Closed(closed) => {
                info!(
                    total_players = snapshot.total_players,
                    total_guesses = snapshot.total_guesses,
                    "Prompt closed with frozen results"
                );
                Ok(closed.into())
            }
            ClosePromptResult::AlreadyClosed => Err(AppError::PromptClosed(prompt_id.to_string())),
            ClosePromptResult::NotFound => Err(AppError::NotFound(format!("prompt {prompt_id}"))),
        }
    }

    /// Leaderboard for a closed prompt, built from its frozen snapshot
    #[instrument(skip(self))]
    pub async fn final_results(
        &self,
        prompt_id: &str,
        player: Option<&str>,
    ) -> Result<ResultsResponse, AppError> {
        let prompt = self.require_prompt(prompt_id).await?;
        let snapshot = self
            .store
            .read_frozen_snapshot(prompt_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("final results for prompt {prompt_id}")))?;

        let mut read = PartialRead::new();
        let player_guess = self.read_player_guess(&mut read, prompt_id, player).await;
        let view = ResultsView {
            counts: snapshot.counts,
            total_players: snapshot.total_players,
            player_guess,
        };
        let (view, partial) = read.finish(view).into_result()?;

        Ok(self.respond(&prompt, view, partial))
    }

    /// Drops live guess keys of expired prompts
    #[instrument(skip(self))]
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        Ok(self.store.purge_expired().await?)
    }

    /// Lets a player whose guess was not counted submit again.
    async fn release_guess_flag(&self, prompt_id: &str, player: &str) {
        match self.store.unmark_guessed(prompt_id, player).await {
            Ok(()) => warn!("Guess not counted, player may resubmit"),
            Err(err) => error!(error = %err, "Guess not counted and player is still marked as guessed"),
        }
    }

    async fn require_prompt(&self, prompt_id: &str) -> Result<PromptModel, AppError> {
        self.prompts
            .get_prompt(prompt_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("prompt {prompt_id}")))
    }

    /// Counts are required. The player count falls back to the number of
    /// guesses and the player's guess to none when their reads fail.
    async fn load_live_view(&self, prompt_id: &str, player: Option<&str>) -> ReadOutcome<ResultsView> {
        let counts = match self.store.get_all_guess_counts(prompt_id).await {
            Ok(counts) => counts,
            Err(err) => {
                warn!(error = %err, "Guess counts unavailable");
                return ReadOutcome::Failed(err);
            }
        };

        let mut read = PartialRead::new();
        let total_players = read.or_fallback(
            "distinct_player_count",
            self.store.get_distinct_player_count(prompt_id).await,
            || counts.values().sum(),
        );
        let player_guess = self.read_player_guess(&mut read, prompt_id, player).await;

        read.finish(ResultsView {
            counts,
            total_players,
            player_guess,
        })
    }

    async fn read_player_guess(
        &self,
        read: &mut PartialRead,
        prompt_id: &str,
        player: Option<&str>,
    ) -> Option<String> {
        let player = player.map(str::trim).filter(|p| !p.is_empty())?;
        read.or_fallback(
            "player_guess",
            self.store.get_player_guess(prompt_id, player).await,
            || None,
        )
    }

    fn respond(&self, prompt: &PromptModel, view: ResultsView, partial: bool) -> ResultsResponse {
        let results = assemble(
            AssemblyInput {
                counts: &view.counts,
                creator_answer: &prompt.answer,
                total_players: view.total_players,
                player_guess: view.player_guess.as_deref(),
            },
            &self.settings.aggregation,
        );

        debug!(
            entries = results.aggregation.len(),
            total_players = results.total_players,
            partial,
            "Results assembled"
        );

        ResultsResponse {
            prompt_id: prompt.id.clone(),
            results,
            partial,
        }
    }
}
