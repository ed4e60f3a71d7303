use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::PromptSettings;
use crate::prompt::repository::PromptRepository;
use crate::store::{GuessStore, StoreError};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub prompt_repository: Arc<dyn PromptRepository>,
    pub guess_store: Arc<dyn GuessStore>,
    pub settings: PromptSettings,
}

impl AppState {
    pub fn new(
        prompt_repository: Arc<dyn PromptRepository>,
        guess_store: Arc<dyn GuessStore>,
        settings: PromptSettings,
    ) -> Self {
        Self {
            prompt_repository,
            guess_store,
            settings,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Player has already guessed on this prompt")]
    AlreadyGuessed,

    #[error("Prompt is closed: {0}")]
    PromptClosed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyGuessed | AppError::PromptClosed(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Duplicate(_)) => StatusCode::CONFLICT,
            AppError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_errors_to_status_codes() {
        let cases = [
            (AppError::Validation("empty".into()), StatusCode::BAD_REQUEST),
            (AppError::AlreadyGuessed, StatusCode::CONFLICT),
            (AppError::PromptClosed("p".into()), StatusCode::CONFLICT),
            (AppError::NotFound("p".into()), StatusCode::NOT_FOUND),
            (
                AppError::Store(StoreError::Unavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Store(StoreError::Duplicate("p".into())),
                StatusCode::CONFLICT,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
