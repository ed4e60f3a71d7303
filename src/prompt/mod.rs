// Public API - what other modules can use
pub use cleanup_task::{start_cleanup_task, CleanupConfig};
pub use handlers::{
    close_prompt, create_prompt, final_results, get_prompt, live_results, submit_guess,
};
pub use service::PromptService;

use axum::{
    routing::{get, post},
    Router,
};

use crate::shared::AppState;

// Internal modules
mod cleanup_task;
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;

/// Routes for prompts, guesses and results
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/prompts", post(create_prompt))
        .route("/prompts/:id", get(get_prompt))
        .route("/prompts/:id/guesses", post(submit_guess))
        .route("/prompts/:id/results", get(live_results))
        .route("/prompts/:id/close", post(close_prompt))
        .route("/prompts/:id/final", get(final_results))
}
