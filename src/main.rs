use crowdguess::{
    config::AppConfig,
    prompt::{self, repository::InMemoryPromptRepository, CleanupConfig, PromptService},
    store::{InMemoryGuessStore, RetryingGuessStore},
    AppState,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crowdguess=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    info!(?config, "Starting crowd guess server");

    // Every store call goes through the retry wrapper
    let guess_store = Arc::new(RetryingGuessStore::new(
        InMemoryGuessStore::new(),
        config.store_retry,
    ));
    let prompt_repository = Arc::new(InMemoryPromptRepository::new());
    let app_state = AppState::new(prompt_repository, guess_store, config.prompt);

    tokio::spawn(prompt::start_cleanup_task(
        PromptService::from_state(&app_state),
        CleanupConfig::default(),
    ));

    let app = prompt::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(bind_addr = %config.bind_addr, error = %e, "Failed to bind listener");
            std::process::exit(1);
        }
    };
    info!(bind_addr = %config.bind_addr, "Server listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server terminated with error");
        std::process::exit(1);
    }
}
