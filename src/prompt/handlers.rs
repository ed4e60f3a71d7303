use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument};

use super::{
    service::PromptService,
    types::{
        CreatePromptRequest, PromptResponse, ResultsQuery, ResultsResponse, SubmitGuessRequest,
        SubmitGuessResponse,
    },
};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new prompt
///
/// POST /prompts
#[instrument(name = "create_prompt", skip(state, request))]
pub async fn create_prompt(
    State(state): State<AppState>,
    Json(request): Json<CreatePromptRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    let service = PromptService::from_state(&state);
    let prompt = service.create_prompt(request).await?;

    info!(prompt_id = %prompt.id, "Prompt created successfully");
    Ok(Json(prompt))
}

/// GET /prompts/:id
#[instrument(name = "get_prompt", skip(state))]
pub async fn get_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
) -> Result<Json<PromptResponse>, AppError> {
    let service = PromptService::from_state(&state);
    Ok(Json(service.get_prompt(&prompt_id).await?))
}

/// HTTP handler for submitting a guess
///
/// POST /prompts/:id/guesses
#[instrument(name = "submit_guess", skip(state, request))]
pub async fn submit_guess(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
    Json(request): Json<SubmitGuessRequest>,
) -> Result<Json<SubmitGuessResponse>, AppError> {
    let service = PromptService::from_state(&state);
    let submitted = service.submit_guess(&prompt_id, request).await?;
    Ok(Json(submitted))
}

/// HTTP handler for the live leaderboard
///
/// GET /prompts/:id/results?player=
#[instrument(name = "live_results", skip(state))]
pub async fn live_results(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    let service = PromptService::from_state(&state);
    let results = service
        .live_results(&prompt_id, query.player.as_deref())
        .await?;
    Ok(Json(results))
}

/// POST /prompts/:id/close
#[instrument(name = "close_prompt", skip(state))]
pub async fn close_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
) -> Result<Json<PromptResponse>, AppError> {
    let service = PromptService::from_state(&state);
    let prompt = service.close_prompt(&prompt_id).await?;

    info!(prompt_id = %prompt.id, "Prompt closed successfully");
    Ok(Json(prompt))
}

/// HTTP handler for the frozen leaderboard of a closed prompt
///
/// GET /prompts/:id/final?player=
#[instrument(name = "final_results", skip(state))]
pub async fn final_results(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    let service = PromptService::from_state(&state);
    let results = service
        .final_results(&prompt_id, query.player.as_deref())
        .await?;
    Ok(Json(results))
}
